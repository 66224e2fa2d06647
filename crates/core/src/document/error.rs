//! Document error types.

use thiserror::Error;

use deckstore_shared::AppError;

/// Errors raised while reading or writing a presentation package.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Filesystem read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container is corrupt or unreadable.
    #[error("invalid package archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part contains malformed XML.
    #[error("malformed XML in {part}: {message}")]
    Xml {
        /// Part name inside the package.
        part: String,
        /// Parser message.
        message: String,
    },

    /// The archive is not a presentation package.
    #[error("not a presentation package: {0}")]
    Format(String),

    /// Template path has an unsupported extension.
    #[error("template file must be a .pptx or .potx file: {0}")]
    InvalidTemplate(String),
}

impl DocumentError {
    /// Create an XML error for a package part.
    #[must_use]
    pub fn xml(part: impl Into<String>, message: impl ToString) -> Self {
        Self::Xml {
            part: part.into(),
            message: message.to_string(),
        }
    }

    /// Create a format error.
    #[must_use]
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(path) => Self::NotFound(format!("File not found: {path}")),
            DocumentError::Io(e) => Self::LocalIo(e.to_string()),
            DocumentError::InvalidTemplate(path) => Self::InvalidInput(format!(
                "Template file must be a .pptx or .potx file: {path}"
            )),
            other => Self::Document(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error_kinds() {
        let missing = AppError::from(DocumentError::NotFound("deck.pptx".into()));
        assert_eq!(missing.error_code(), "NOT_FOUND");
        assert!(missing.to_string().contains("deck.pptx"));

        let template = AppError::from(DocumentError::InvalidTemplate("deck.docx".into()));
        assert_eq!(template.error_code(), "INVALID_INPUT");

        let io = AppError::from(DocumentError::Io(std::io::Error::other("disk full")));
        assert_eq!(io.error_code(), "LOCAL_IO_ERROR");

        let xml = AppError::from(DocumentError::xml("docProps/core.xml", "bad tag"));
        assert_eq!(xml.error_code(), "DOCUMENT_ERROR");
    }
}
