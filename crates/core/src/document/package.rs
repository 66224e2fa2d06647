//! In-memory presentation package.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::blank;
use super::error::DocumentError;
use super::properties::{CORE_PART, CoreProperties, CorePropertiesUpdate};
use crate::storage::Document;

/// MIME type registered for `.pptx` files.
pub const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Canonical file extension, including the dot.
pub const PPTX_EXTENSION: &str = ".pptx";

/// Extensions accepted for templates.
pub const TEMPLATE_EXTENSIONS: [&str; 2] = ["pptx", "potx"];

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";
const MAIN_PART: &str = "ppt/presentation.xml";
const LAYOUT_PREFIX: &str = "ppt/slideLayouts/slideLayout";

const PRESENTATION_MAIN_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const TEMPLATE_MAIN_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

const CORE_OVERRIDE: &str = r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#;
const CORE_RELATIONSHIP_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// An open PowerPoint document.
///
/// Parts other than `docProps/core.xml` are carried through unchanged; the
/// core properties part is regenerated from [`CoreProperties`] on every
/// serialization.
#[derive(Debug, Clone)]
pub struct Presentation {
    parts: BTreeMap<String, Bytes>,
    core: CoreProperties,
    slide_count: usize,
}

impl Presentation {
    /// Create an empty deck with the default master and layouts.
    #[must_use]
    pub fn blank() -> Self {
        let parts = blank::parts()
            .into_iter()
            .map(|(name, data)| (name.to_string(), Bytes::from(data)))
            .collect();

        Self {
            parts,
            core: CoreProperties::new_document(Utc::now()),
            slide_count: 0,
        }
    }

    /// Open a `.pptx` file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocumentError::NotFound(path.display().to_string()),
            _ => DocumentError::Io(e),
        })?;

        Self::from_bytes(&data)
    }

    /// Load a template (`.pptx` or `.potx`) as a new, regular presentation.
    pub async fn from_template(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                TEMPLATE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            });
        if !supported {
            return Err(DocumentError::InvalidTemplate(path.display().to_string()));
        }

        let mut presentation = Self::open(path).await?;
        presentation.convert_template_main_part()?;
        Ok(presentation)
    }

    /// Read a package from its serialized bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = BTreeMap::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut buf = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
            entry.read_to_end(&mut buf)?;
            parts.insert(entry.name().to_string(), Bytes::from(buf));
        }

        for required in [CONTENT_TYPES_PART, MAIN_PART] {
            if !parts.contains_key(required) {
                return Err(DocumentError::format(format!("missing part {required}")));
            }
        }

        let slide_count = count_slides(&parts[MAIN_PART])?;

        let core = match parts.get(CORE_PART) {
            Some(xml) => CoreProperties::parse(&part_str(CORE_PART, xml)?)?,
            None => {
                register_core_part(&mut parts)?;
                CoreProperties::default()
            }
        };

        Ok(Self {
            parts,
            core,
            slide_count,
        })
    }

    /// Serialize the whole package into a `.pptx` byte buffer.
    pub fn to_bytes(&self) -> Result<Bytes, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let core_xml = self.core.to_xml();

        // [Content_Types].xml goes first, as Office writes it.
        if let Some(content_types) = self.parts.get(CONTENT_TYPES_PART) {
            writer.start_file(CONTENT_TYPES_PART, options)?;
            writer.write_all(content_types)?;
        }

        for (name, data) in &self.parts {
            if name == CONTENT_TYPES_PART || name == CORE_PART {
                continue;
            }
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }

        writer.start_file(CORE_PART, options)?;
        writer.write_all(core_xml.as_bytes())?;

        Ok(Bytes::from(writer.finish()?.into_inner()))
    }

    /// Write the package to `path`, replacing any existing file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let data = self.to_bytes()?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    /// Number of slides listed in the presentation.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Number of slide layouts in the package.
    #[must_use]
    pub fn layout_count(&self) -> usize {
        self.parts
            .keys()
            .filter(|name| {
                name.strip_prefix(LAYOUT_PREFIX)
                    .and_then(|rest| rest.strip_suffix(".xml"))
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .count()
    }

    /// Core document properties.
    #[must_use]
    pub fn core_properties(&self) -> &CoreProperties {
        &self.core
    }

    /// Update the given core properties, leaving the others untouched.
    pub fn set_core_properties(&mut self, update: CorePropertiesUpdate) {
        self.core.apply(update, Utc::now());
    }

    /// Rewrite a template main part content type to a presentation one.
    fn convert_template_main_part(&mut self) -> Result<(), DocumentError> {
        let content_types = part_str(CONTENT_TYPES_PART, &self.parts[CONTENT_TYPES_PART])?;
        if content_types.contains(TEMPLATE_MAIN_TYPE) {
            let converted = content_types.replace(TEMPLATE_MAIN_TYPE, PRESENTATION_MAIN_TYPE);
            self.parts
                .insert(CONTENT_TYPES_PART.to_string(), Bytes::from(converted));
        }
        Ok(())
    }
}

impl Document for Presentation {
    fn encode(&self) -> Result<Bytes, DocumentError> {
        self.to_bytes()
    }

    fn content_type(&self) -> &'static str {
        PRESENTATION_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        PPTX_EXTENSION
    }
}

fn part_str(name: &str, data: &Bytes) -> Result<String, DocumentError> {
    String::from_utf8(data.to_vec())
        .map_err(|e| DocumentError::xml(name, format!("invalid UTF-8: {e}")))
}

/// Count `<p:sldId>` entries in `ppt/presentation.xml`.
fn count_slides(xml: &Bytes) -> Result<usize, DocumentError> {
    let xml = part_str(MAIN_PART, xml)?;
    let mut reader = Reader::from_str(&xml);
    let mut count = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                count += 1;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::xml(MAIN_PART, e)),
            _ => {}
        }
    }

    Ok(count)
}

/// Add the content type override and package relationship that a package
/// without `docProps/core.xml` needs before one is written.
fn register_core_part(parts: &mut BTreeMap<String, Bytes>) -> Result<(), DocumentError> {
    let content_types = part_str(CONTENT_TYPES_PART, &parts[CONTENT_TYPES_PART])?;
    let content_types = content_types
        .rfind("</Types>")
        .map(|at| format!("{}{CORE_OVERRIDE}{}", &content_types[..at], &content_types[at..]))
        .ok_or_else(|| DocumentError::format("[Content_Types].xml has no closing Types tag"))?;
    parts.insert(CONTENT_TYPES_PART.to_string(), Bytes::from(content_types));

    let rels = match parts.get(ROOT_RELS_PART) {
        Some(data) => part_str(ROOT_RELS_PART, data)?,
        None => return Err(DocumentError::format("missing part _rels/.rels")),
    };
    if !rels.contains(CORE_RELATIONSHIP_TYPE) {
        let relationship = format!(
            r#"<Relationship Id="rIdCoreProps" Type="{CORE_RELATIONSHIP_TYPE}" Target="docProps/core.xml"/>"#
        );
        let rels = rels
            .rfind("</Relationships>")
            .map(|at| format!("{}{relationship}{}", &rels[..at], &rels[at..]))
            .ok_or_else(|| DocumentError::format("_rels/.rels has no closing Relationships tag"))?;
        parts.insert(ROOT_RELS_PART.to_string(), Bytes::from(rels));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start file");
            writer.write_all(data.as_bytes()).expect("write part");
        }
        writer.finish().expect("finish zip").into_inner()
    }

    const TWO_SLIDES: &str = r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst></p:presentation>"#;

    #[test]
    fn test_blank_has_layouts_and_no_slides() {
        let presentation = Presentation::blank();
        assert_eq!(presentation.slide_count(), 0);
        assert_eq!(presentation.layout_count(), 2);
        assert!(presentation.core_properties().created.is_some());
        assert_eq!(presentation.core_properties().revision.as_deref(), Some("1"));
    }

    #[test]
    fn test_blank_serializes_to_readable_package() {
        let mut presentation = Presentation::blank();
        presentation.set_core_properties(CorePropertiesUpdate {
            title: Some("Launch plan".to_string()),
            ..CorePropertiesUpdate::default()
        });

        let bytes = presentation.to_bytes().expect("should serialize");
        let reopened = Presentation::from_bytes(&bytes).expect("should reopen");

        assert_eq!(reopened.layout_count(), 2);
        assert_eq!(reopened.slide_count(), 0);
        assert_eq!(reopened.core_properties().title.as_deref(), Some("Launch plan"));

        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
        let first = archive.by_index(0).expect("first entry");
        assert_eq!(first.name(), CONTENT_TYPES_PART);
    }

    #[test]
    fn test_slide_count_reads_slide_list() {
        let data = package_with(&[
            (CONTENT_TYPES_PART, "<Types></Types>"),
            (ROOT_RELS_PART, "<Relationships></Relationships>"),
            (MAIN_PART, TWO_SLIDES),
            ("ppt/slideLayouts/slideLayout1.xml", "<p:sldLayout/>"),
            ("ppt/slideLayouts/_rels/slideLayout1.xml.rels", "<Relationships/>"),
        ]);

        let presentation = Presentation::from_bytes(&data).expect("should open");
        assert_eq!(presentation.slide_count(), 2);
        assert_eq!(presentation.layout_count(), 1);
    }

    #[test]
    fn test_missing_core_part_is_registered() {
        let data = package_with(&[
            (CONTENT_TYPES_PART, "<Types></Types>"),
            (ROOT_RELS_PART, "<Relationships></Relationships>"),
            (MAIN_PART, TWO_SLIDES),
        ]);

        let presentation = Presentation::from_bytes(&data).expect("should open");
        assert_eq!(presentation.core_properties(), &CoreProperties::default());

        let content_types = String::from_utf8(presentation.parts[CONTENT_TYPES_PART].to_vec())
            .expect("utf-8");
        assert!(content_types.contains("/docProps/core.xml"));
        let rels =
            String::from_utf8(presentation.parts[ROOT_RELS_PART].to_vec()).expect("utf-8");
        assert!(rels.contains(CORE_RELATIONSHIP_TYPE));
    }

    #[test]
    fn test_non_presentation_archive_is_rejected() {
        let data = package_with(&[(CONTENT_TYPES_PART, "<Types></Types>"), ("word/document.xml", "<w/>")]);

        let err = Presentation::from_bytes(&data).expect_err("not a deck");
        assert!(matches!(err, DocumentError::Format(_)));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = Presentation::from_bytes(b"definitely not a zip").expect_err("not a zip");
        assert!(matches!(err, DocumentError::Zip(_)));
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let err = Presentation::open("/nonexistent/deck.pptx")
            .await
            .expect_err("missing file");
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_template_extension_is_checked() {
        let err = Presentation::from_template("theme.key")
            .await
            .expect_err("unsupported extension");
        assert!(matches!(err, DocumentError::InvalidTemplate(_)));
    }

    #[tokio::test]
    async fn test_potx_template_becomes_presentation() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("Corporate.POTX");

        let blank = Presentation::blank();
        let content_types = String::from_utf8(blank.parts[CONTENT_TYPES_PART].to_vec())
            .expect("utf-8")
            .replace(PRESENTATION_MAIN_TYPE, TEMPLATE_MAIN_TYPE);
        let mut template = blank.clone();
        template
            .parts
            .insert(CONTENT_TYPES_PART.to_string(), Bytes::from(content_types));
        template.save(&path).await.expect("write template");

        let presentation = Presentation::from_template(&path).await.expect("should load");
        let content_types = String::from_utf8(presentation.parts[CONTENT_TYPES_PART].to_vec())
            .expect("utf-8");
        assert!(content_types.contains(PRESENTATION_MAIN_TYPE));
        assert!(!content_types.contains(TEMPLATE_MAIN_TYPE));
        assert_eq!(presentation.layout_count(), 2);
    }

    #[tokio::test]
    async fn test_save_and_open_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("deck.pptx");

        let mut presentation = Presentation::blank();
        presentation.set_core_properties(CorePropertiesUpdate {
            author: Some("Riley".to_string()),
            ..CorePropertiesUpdate::default()
        });
        presentation.save(&path).await.expect("should save");

        let reopened = Presentation::open(&path).await.expect("should open");
        assert_eq!(reopened.core_properties().author.as_deref(), Some("Riley"));
    }
}
