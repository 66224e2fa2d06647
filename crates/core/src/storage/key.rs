//! Object key and URL construction.

/// Strip trailing `/` separators from a key prefix.
#[must_use]
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_end_matches('/')
}

/// Last path component of a caller-supplied name.
///
/// Both `/` and `\` count as separators, so callers cannot steer the key
/// outside the configured prefix. Returns `None` when nothing is left.
#[must_use]
pub fn base_filename(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\']).next().filter(|base| !base.trim().is_empty())
}

/// Append `extension` (including its dot) unless already present.
#[must_use]
pub fn ensure_extension(filename: &str, extension: &str) -> String {
    if filename.ends_with(extension) {
        filename.to_string()
    } else {
        format!("{filename}{extension}")
    }
}

/// Object key: `{prefix without trailing /}/{filename}`.
#[must_use]
pub fn object_key(prefix: &str, filename: &str) -> String {
    format!("{}/{filename}", normalize_prefix(prefix))
}

/// Canonical `s3://bucket/key` URI.
#[must_use]
pub fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// Virtual-hosted-style HTTPS URL.
#[must_use]
pub fn https_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // normalize_prefix is idempotent for every prefix.
    proptest! {
        #[test]
        fn prop_normalize_prefix_idempotent(prefix in ".*") {
            let once = normalize_prefix(&prefix);
            prop_assert_eq!(normalize_prefix(once), once);
        }
    }

    // The stored filename ends with the extension exactly once.
    proptest! {
        #[test]
        fn prop_extension_appended_once(name in "[a-zA-Z0-9_-]{1,30}(\\.pptx)?") {
            let filename = ensure_extension(&name, ".pptx");
            prop_assert!(filename.ends_with(".pptx"));
            prop_assert!(!filename.ends_with(".pptx.pptx"));
            prop_assert_eq!(ensure_extension(&filename, ".pptx"), filename.clone());
        }
    }

    // Keys are always prefix + one slash + filename.
    proptest! {
        #[test]
        fn prop_object_key_layout(
            prefix in "[a-z]{1,10}(/[a-z]{1,10})?/{0,3}",
            filename in "[a-zA-Z0-9_-]{1,20}\\.pptx",
        ) {
            let key = object_key(&prefix, &filename);
            prop_assert_eq!(key.clone(), format!("{}/{}", normalize_prefix(&prefix), filename));
            let suffix = format!("/{filename}");
            prop_assert!(!key.contains("//"));
            prop_assert!(key.ends_with(&suffix));
        }
    }

    // Directory components never reach the key.
    proptest! {
        #[test]
        fn prop_base_filename_has_no_separators(
            dirs in proptest::collection::vec("[a-z.]{1,8}", 0..4),
            name in "[a-zA-Z0-9_-]{1,20}",
        ) {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&name);

            let base = base_filename(&path);
            prop_assert_eq!(base, Some(name.as_str()));
        }
    }
}
