//! Core document properties (`docProps/core.xml`).
//!
//! Core properties follow the Dublin Core metadata set with the OPC
//! extensions. The author is stored as `dc:creator` and comments as
//! `dc:description`.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use super::error::DocumentError;

pub(crate) const CORE_PART: &str = "docProps/core.xml";

/// Descriptive metadata of a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreProperties {
    /// Document title.
    pub title: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Keywords, free text.
    pub keywords: Option<String>,
    /// Comments.
    pub comments: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Last editor.
    pub last_modified_by: Option<String>,
    /// Revision number.
    pub revision: Option<String>,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
}

/// Partial update of [`CoreProperties`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorePropertiesUpdate {
    /// New title.
    pub title: Option<String>,
    /// New subject.
    pub subject: Option<String>,
    /// New author.
    pub author: Option<String>,
    /// New keywords.
    pub keywords: Option<String>,
    /// New comments.
    pub comments: Option<String>,
}

impl CoreProperties {
    /// Properties for a freshly created document.
    #[must_use]
    pub fn new_document(now: DateTime<Utc>) -> Self {
        Self {
            revision: Some("1".to_string()),
            created: Some(now),
            modified: Some(now),
            ..Self::default()
        }
    }

    /// Apply an update, stamping `modified` with `now`.
    pub fn apply(&mut self, update: CorePropertiesUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(subject) = update.subject {
            self.subject = Some(subject);
        }
        if let Some(author) = update.author {
            self.author = Some(author);
        }
        if let Some(keywords) = update.keywords {
            self.keywords = Some(keywords);
        }
        if let Some(comments) = update.comments {
            self.comments = Some(comments);
        }
        self.modified = Some(now);
    }

    /// Parse `docProps/core.xml`.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut props = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    let slot = match name.as_ref() {
                        b"dc:title" => Field::Text(&mut props.title),
                        b"dc:subject" => Field::Text(&mut props.subject),
                        b"dc:creator" => Field::Text(&mut props.author),
                        b"cp:keywords" => Field::Text(&mut props.keywords),
                        b"dc:description" => Field::Text(&mut props.comments),
                        b"cp:category" => Field::Text(&mut props.category),
                        b"cp:lastModifiedBy" => Field::Text(&mut props.last_modified_by),
                        b"cp:revision" => Field::Text(&mut props.revision),
                        b"dcterms:created" => Field::Time(&mut props.created),
                        b"dcterms:modified" => Field::Time(&mut props.modified),
                        _ => continue,
                    };
                    let text = read_text(&mut reader)?;
                    match slot {
                        Field::Text(target) => *target = text,
                        Field::Time(target) => *target = text.as_deref().and_then(parse_datetime),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocumentError::xml(CORE_PART, e)),
                _ => {}
            }
        }

        Ok(props)
    }

    /// Render as `docProps/core.xml`.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        ));

        let text_fields = [
            ("dc:title", &self.title),
            ("dc:subject", &self.subject),
            ("dc:creator", &self.author),
            ("cp:keywords", &self.keywords),
            ("dc:description", &self.comments),
            ("cp:category", &self.category),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("cp:revision", &self.revision),
        ];
        for (tag, value) in text_fields {
            if let Some(value) = value {
                xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value.as_str())));
            }
        }

        for (tag, value) in [("dcterms:created", self.created), ("dcterms:modified", self.modified)] {
            if let Some(value) = value {
                xml.push_str(&format!(
                    r#"<{tag} xsi:type="dcterms:W3CDTF">{}</{tag}>"#,
                    value.format("%Y-%m-%dT%H:%M:%SZ")
                ));
            }
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

enum Field<'a> {
    Text(&'a mut Option<String>),
    Time(&'a mut Option<DateTime<Utc>>),
}

/// Read the text content of the element just opened.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<Option<String>, DocumentError> {
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let chunk = e.unescape().map_err(|e| DocumentError::xml(CORE_PART, e))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::End(_) | Event::Eof) => break,
            Err(e) => return Err(DocumentError::xml(CORE_PART, e)),
            _ => {}
        }
    }

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Parse a W3CDTF timestamp, assuming UTC when no offset is given.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}
