//! Template file lookup.
//!
//! A requested template path is used as-is when it exists. Otherwise its
//! file name is looked up in each search directory in order, so callers can
//! refer to shared templates by name alone.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use deckstore_shared::AppError;

/// Directories searched after any configured ones.
pub const DEFAULT_SEARCH_DIRS: [&str; 2] = [".", "./templates"];

/// Template lookup errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No candidate file exists.
    #[error("Template file not found: {path}. Searched in: {}", format_dirs(.searched))]
    NotFound {
        /// Path as requested.
        path: String,
        /// Directories that were searched.
        searched: Vec<PathBuf>,
    },
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        Self::NotFound(err.to_string())
    }
}

fn format_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves template names against a list of directories.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    search_dirs: Vec<PathBuf>,
}

impl Default for TemplateLocator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TemplateLocator {
    /// Search `dirs` first, then the defaults.
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        let mut search_dirs = dirs;
        for default in DEFAULT_SEARCH_DIRS {
            let default = PathBuf::from(default);
            if !search_dirs.contains(&default) {
                search_dirs.push(default);
            }
        }
        Self { search_dirs }
    }

    /// Directories searched, in order.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Find the file for `requested`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] listing every searched directory.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, TemplateError> {
        let direct = Path::new(requested);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        if let Some(name) = direct.file_name() {
            for dir in &self.search_dirs {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    debug!(requested, found = %candidate.display(), "Template resolved from search path");
                    return Ok(candidate);
                }
            }
        }

        Err(TemplateError::NotFound {
            path: requested.to_string(),
            searched: self.search_dirs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_configured_dirs() {
        let locator = TemplateLocator::new(vec![PathBuf::from("/srv/templates")]);
        assert_eq!(
            locator.search_dirs(),
            &[
                PathBuf::from("/srv/templates"),
                PathBuf::from("."),
                PathBuf::from("./templates"),
            ]
        );
    }

    #[test]
    fn test_defaults_not_duplicated() {
        let locator = TemplateLocator::new(vec![PathBuf::from("./templates")]);
        assert_eq!(locator.search_dirs().len(), 2);
    }

    #[test]
    fn test_existing_path_used_directly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("brand.pptx");
        std::fs::write(&path, b"x").expect("write");

        let found = TemplateLocator::default()
            .resolve(path.to_str().expect("utf-8 path"))
            .expect("found");
        assert_eq!(found, path);
    }

    #[test]
    fn test_file_name_found_in_search_dir() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        std::fs::write(second.path().join("brand.potx"), b"x").expect("write");

        let locator =
            TemplateLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        let found = locator
            .resolve("missing/dir/brand.potx")
            .expect("found by name");
        assert_eq!(found, second.path().join("brand.potx"));
    }

    #[test]
    fn test_first_directory_wins() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        std::fs::write(first.path().join("brand.pptx"), b"1").expect("write");
        std::fs::write(second.path().join("brand.pptx"), b"2").expect("write");

        let locator =
            TemplateLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(
            locator.resolve("brand.pptx").expect("found"),
            first.path().join("brand.pptx")
        );
    }

    #[test]
    fn test_not_found_lists_searched_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let locator = TemplateLocator::new(vec![dir.path().to_path_buf()]);

        let err = locator
            .resolve("no-such-template-7f3a.pptx")
            .expect_err("missing");
        let message = err.to_string();
        assert!(message.starts_with("Template file not found: no-such-template-7f3a.pptx"));
        assert!(message.contains(&dir.path().display().to_string()));
        assert!(message.contains("./templates"));

        assert_eq!(AppError::from(err).error_code(), "NOT_FOUND");
    }
}
