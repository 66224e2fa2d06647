//! Presentation registry.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::document::Presentation;

/// Handle to a registered presentation.
pub type SharedPresentation = Arc<tokio::sync::RwLock<Presentation>>;

/// Registry of open presentations keyed by caller-visible ID.
///
/// Thread-safe and cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct PresentationRegistry {
    /// Presentation handles by ID.
    presentations: Arc<DashMap<String, SharedPresentation>>,
    /// ID used when a tool call names none.
    current: Arc<RwLock<Option<String>>>,
}

impl PresentationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `presentation` and make it current.
    ///
    /// Without an explicit `id` the first free `presentation_{n}` is used,
    /// counting up from the registry size plus one. An explicit `id` replaces
    /// any presentation already registered under it.
    pub fn insert(&self, id: Option<String>, presentation: Presentation) -> String {
        let handle = Arc::new(tokio::sync::RwLock::new(presentation));

        let id = match id {
            Some(id) => {
                self.presentations.insert(id.clone(), handle);
                id
            }
            None => self.insert_generated(handle),
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        debug!(presentation_id = %id, "Presentation registered");
        id
    }

    fn insert_generated(&self, handle: SharedPresentation) -> String {
        let mut n = self.presentations.len() + 1;
        loop {
            let candidate = format!("presentation_{n}");
            if let Entry::Vacant(slot) = self.presentations.entry(candidate.clone()) {
                slot.insert(handle);
                return candidate;
            }
            n += 1;
        }
    }

    /// Look up `id`, or the current presentation when `id` is `None`.
    #[must_use]
    pub fn get(&self, id: Option<&str>) -> Option<SharedPresentation> {
        match id {
            Some(id) => self.presentations.get(id).map(|entry| Arc::clone(entry.value())),
            None => {
                let current = self.current_id()?;
                self.presentations
                    .get(&current)
                    .map(|entry| Arc::clone(entry.value()))
            }
        }
    }

    /// ID of the current presentation.
    #[must_use]
    pub fn current_id(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve an optional ID to the one a lookup would use.
    #[must_use]
    pub fn resolve_id(&self, id: Option<&str>) -> Option<String> {
        id.map(str::to_string).or_else(|| self.current_id())
    }

    /// Number of registered presentations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }
}
