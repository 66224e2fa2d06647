//! Persistence tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use deckstore_core::storage::{
    NO_DOCUMENT_MESSAGE, PersistOutcome, StorageDescription, StorageMode,
};
use deckstore_shared::AppError;

use super::{Tool, ToolResult, parse_args, require_non_empty, success};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SaveArgs {
    file_path: String,
    #[serde(default)]
    presentation_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Serialize)]
struct Saved {
    #[serde(flatten)]
    outcome: PersistOutcome,
    message: String,
    presentation_id: String,
}

#[derive(Serialize)]
struct ModeReport {
    #[serde(flatten)]
    description: StorageDescription,
    message: &'static str,
}

pub(super) async fn save(state: &AppState, args: Value) -> ToolResult {
    let args: SaveArgs = parse_args(Tool::SavePresentation, args)?;

    let not_loaded = || AppError::NotFound(NO_DOCUMENT_MESSAGE.to_string());
    let id = state
        .registry
        .resolve_id(args.presentation_id.as_deref())
        .ok_or_else(not_loaded)?;
    let handle = state.registry.get(Some(&id)).ok_or_else(not_loaded)?;

    require_non_empty("file_path", &args.file_path)?;
    let service = state.persistence()?;

    let presentation = handle.read().await;
    let outcome = service
        .persist(Some(&*presentation), &args.file_path)
        .await?;

    success(&Saved {
        message: outcome.message(),
        outcome,
        presentation_id: id,
    })
}

pub(super) fn mode(state: &AppState, args: Value) -> ToolResult {
    let _: NoArgs = parse_args(Tool::GetStorageMode, args)?;

    let description = state.persistence()?.resolver().describe();
    let message = match description.storage_mode {
        StorageMode::S3 => "S3 storage is ENABLED - presentations will be saved to S3",
        StorageMode::Local => {
            "Local storage is active - presentations will be saved to local file system"
        }
    };

    success(&ModeReport {
        description,
        message,
    })
}
