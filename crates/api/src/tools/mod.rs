//! Tool catalog and dispatch.
//!
//! Every tool takes a JSON object of keyword arguments and produces a flat
//! JSON object. Failures never escape as errors: they become
//! `{"success": false, "error": ..., "error_code": ...}`.

mod presentation;
mod storage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use deckstore_shared::AppError;

use crate::AppState;

/// Outcome of a tool body before it is flattened into a response.
pub type ToolResult = Result<Value, AppError>;

/// A callable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Start an empty deck.
    CreatePresentation,
    /// Start a deck from a `.pptx`/`.potx` template.
    CreatePresentationFromTemplate,
    /// Load an existing `.pptx` file.
    OpenPresentation,
    /// Persist a deck to the configured destination.
    SavePresentation,
    /// Summarize a deck.
    GetPresentationInfo,
    /// Update document metadata.
    SetCoreProperties,
    /// Report where decks will be persisted.
    GetStorageMode,
}

/// One argument in a tool's schema.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentSpec {
    /// Argument name.
    pub name: &'static str,
    /// JSON type.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// What the argument means.
    pub description: &'static str,
}

/// Catalog entry for a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Tool name used in the invoke route.
    pub name: &'static str,
    /// What the tool does.
    pub description: &'static str,
    /// Keyword arguments.
    pub arguments: Vec<ArgumentSpec>,
}

const fn required(name: &'static str, description: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: "string",
        required: true,
        description,
    }
}

const fn optional(name: &'static str, description: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: "string",
        required: false,
        description,
    }
}

const PRESENTATION_ID: ArgumentSpec = optional(
    "presentation_id",
    "Presentation to use; defaults to the current one",
);
const NEW_ID: ArgumentSpec = optional("id", "ID to register the presentation under");

impl Tool {
    /// Every tool, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::CreatePresentation,
        Self::CreatePresentationFromTemplate,
        Self::OpenPresentation,
        Self::SavePresentation,
        Self::GetPresentationInfo,
        Self::SetCoreProperties,
        Self::GetStorageMode,
    ];

    /// Name used in the invoke route.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreatePresentation => "create_presentation",
            Self::CreatePresentationFromTemplate => "create_presentation_from_template",
            Self::OpenPresentation => "open_presentation",
            Self::SavePresentation => "save_presentation",
            Self::GetPresentationInfo => "get_presentation_info",
            Self::SetCoreProperties => "set_core_properties",
            Self::GetStorageMode => "get_storage_mode",
        }
    }

    /// Look a tool up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Catalog entry.
    #[must_use]
    pub fn spec(self) -> ToolSpec {
        let (description, arguments) = match self {
            Self::CreatePresentation => ("Create a new PowerPoint presentation.", vec![NEW_ID]),
            Self::CreatePresentationFromTemplate => (
                "Create a new PowerPoint presentation from a template file.",
                vec![
                    required(
                        "template_path",
                        "Template file; bare names are looked up in the template directories",
                    ),
                    NEW_ID,
                ],
            ),
            Self::OpenPresentation => (
                "Open an existing PowerPoint presentation from a file.",
                vec![required("file_path", "Path of the .pptx file"), NEW_ID],
            ),
            Self::SavePresentation => (
                "Save a presentation to S3 when enabled, otherwise to a local file.",
                vec![
                    required(
                        "file_path",
                        "Local path, or the object file name in S3 mode",
                    ),
                    PRESENTATION_ID,
                ],
            ),
            Self::GetPresentationInfo => (
                "Get information about a presentation.",
                vec![PRESENTATION_ID],
            ),
            Self::SetCoreProperties => (
                "Set core document properties.",
                vec![
                    optional("title", "Document title"),
                    optional("subject", "Document subject"),
                    optional("author", "Document author"),
                    optional("keywords", "Keywords"),
                    optional("comments", "Comments"),
                    PRESENTATION_ID,
                ],
            ),
            Self::GetStorageMode => (
                "Get the current storage mode configuration (S3 or local).",
                Vec::new(),
            ),
        };

        ToolSpec {
            name: self.name(),
            description,
            arguments,
        }
    }
}

/// Full tool catalog.
#[must_use]
pub fn catalog() -> Vec<ToolSpec> {
    Tool::ALL.into_iter().map(Tool::spec).collect()
}

/// Run `tool` with `args` and flatten the outcome into a response body.
pub async fn invoke(state: &AppState, tool: Tool, args: Value) -> Value {
    let result = match tool {
        Tool::CreatePresentation => presentation::create(state, args),
        Tool::CreatePresentationFromTemplate => {
            presentation::create_from_template(state, args).await
        }
        Tool::OpenPresentation => presentation::open(state, args).await,
        Tool::SavePresentation => storage::save(state, args).await,
        Tool::GetPresentationInfo => presentation::info(state, args).await,
        Tool::SetCoreProperties => presentation::set_core_properties(state, args).await,
        Tool::GetStorageMode => storage::mode(state, args),
    };

    match result {
        Ok(body) => {
            info!(tool = tool.name(), "Tool succeeded");
            body
        }
        Err(e) => {
            warn!(tool = tool.name(), error = %e, "Tool failed");
            failure(&e)
        }
    }
}

/// Failure body for `err`.
#[must_use]
pub fn failure(err: &AppError) -> Value {
    json!({
        "success": false,
        "error": err.to_string(),
        "error_code": err.error_code(),
    })
}

/// Serialize `payload` and mark it successful.
pub(crate) fn success<T: Serialize>(payload: &T) -> ToolResult {
    let mut body = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };
    body.insert("success".to_string(), Value::Bool(true));
    Ok(Value::Object(body))
}

/// Decode keyword arguments for `tool`.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: Tool, args: Value) -> Result<T, AppError> {
    if !args.is_object() {
        return Err(AppError::InvalidInput(format!(
            "arguments for {} must be a JSON object",
            tool.name()
        )));
    }
    serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("invalid arguments for {}: {e}", tool.name())))
}

/// Reject a blank required string argument.
pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::InvalidInput(format!("{name} must not be empty")))
    } else {
        Ok(())
    }
}
