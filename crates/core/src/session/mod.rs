//! In-memory presentation sessions.
//!
//! Presentations created or opened by tools live here until the process
//! exits. Each handle is shared, so a tool can hold one across awaits while
//! others are looked up concurrently.

mod registry;

pub use registry::{PresentationRegistry, SharedPresentation};
