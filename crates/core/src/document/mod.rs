//! PowerPoint (`.pptx`) package handling.
//!
//! A [`Presentation`] is an in-memory Office Open XML package: every part of
//! the ZIP archive is kept as raw bytes, and only the core properties
//! (`docProps/core.xml`) and the slide list are parsed. Slide content is
//! never interpreted.
//!
//! ```text
//! open / from_template ──► Presentation ──► to_bytes / save
//!        blank ──────────►     │
//!                              └─ core properties (title, author, ...)
//! ```

mod blank;
mod error;
mod package;
mod properties;

pub use error::DocumentError;
pub use package::{
    PPTX_EXTENSION, PRESENTATION_CONTENT_TYPE, Presentation, TEMPLATE_EXTENSIONS,
};
pub use properties::{CoreProperties, CorePropertiesUpdate};
