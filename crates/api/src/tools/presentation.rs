//! Presentation lifecycle tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use deckstore_core::document::{CoreProperties, CorePropertiesUpdate, Presentation};
use deckstore_core::storage::NO_DOCUMENT_MESSAGE;
use deckstore_shared::AppError;

use super::{Tool, ToolResult, parse_args, require_non_empty, success};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateArgs {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FromTemplateArgs {
    template_path: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OpenArgs {
    file_path: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InfoArgs {
    #[serde(default)]
    presentation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorePropertiesArgs {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    presentation_id: Option<String>,
}

impl CorePropertiesArgs {
    fn update(&self) -> CorePropertiesUpdate {
        CorePropertiesUpdate {
            title: self.title.clone(),
            subject: self.subject.clone(),
            author: self.author.clone(),
            keywords: self.keywords.clone(),
            comments: self.comments.clone(),
        }
    }
}

#[derive(Serialize)]
struct Created {
    presentation_id: String,
    message: String,
    slide_count: usize,
}

#[derive(Serialize)]
struct CreatedFromTemplate {
    presentation_id: String,
    message: String,
    template_path: String,
    slide_count: usize,
    layout_count: usize,
}

#[derive(Serialize)]
struct Info<'a> {
    presentation_id: String,
    slide_count: usize,
    layout_count: usize,
    core_properties: &'a CoreProperties,
}

#[derive(Serialize)]
struct PropertiesUpdated<'a> {
    presentation_id: String,
    message: &'static str,
    core_properties: &'a CoreProperties,
}

fn not_loaded() -> AppError {
    AppError::NotFound(NO_DOCUMENT_MESSAGE.to_string())
}

pub(super) fn create(state: &AppState, args: Value) -> ToolResult {
    let args: CreateArgs = parse_args(Tool::CreatePresentation, args)?;

    let presentation = Presentation::blank();
    let slide_count = presentation.slide_count();
    let id = state.registry.insert(args.id, presentation);

    success(&Created {
        message: format!("Created new presentation with ID: {id}"),
        presentation_id: id,
        slide_count,
    })
}

pub(super) async fn create_from_template(state: &AppState, args: Value) -> ToolResult {
    let args: FromTemplateArgs = parse_args(Tool::CreatePresentationFromTemplate, args)?;
    require_non_empty("template_path", &args.template_path)?;

    let path = state.templates.resolve(&args.template_path)?;
    let presentation = Presentation::from_template(&path).await?;
    let slide_count = presentation.slide_count();
    let layout_count = presentation.layout_count();
    let id = state.registry.insert(args.id, presentation);
    let template_path = path.display().to_string();

    success(&CreatedFromTemplate {
        message: format!("Created new presentation from template '{template_path}' with ID: {id}"),
        presentation_id: id,
        template_path,
        slide_count,
        layout_count,
    })
}

pub(super) async fn open(state: &AppState, args: Value) -> ToolResult {
    let args: OpenArgs = parse_args(Tool::OpenPresentation, args)?;
    require_non_empty("file_path", &args.file_path)?;

    let presentation = Presentation::open(&args.file_path).await?;
    let slide_count = presentation.slide_count();
    let id = state.registry.insert(args.id, presentation);

    success(&Created {
        message: format!("Opened presentation from {} with ID: {id}", args.file_path),
        presentation_id: id,
        slide_count,
    })
}

pub(super) async fn info(state: &AppState, args: Value) -> ToolResult {
    let args: InfoArgs = parse_args(Tool::GetPresentationInfo, args)?;

    let id = state
        .registry
        .resolve_id(args.presentation_id.as_deref())
        .ok_or_else(not_loaded)?;
    let handle = state.registry.get(Some(&id)).ok_or_else(not_loaded)?;
    let presentation = handle.read().await;

    success(&Info {
        presentation_id: id,
        slide_count: presentation.slide_count(),
        layout_count: presentation.layout_count(),
        core_properties: presentation.core_properties(),
    })
}

pub(super) async fn set_core_properties(state: &AppState, args: Value) -> ToolResult {
    let args: CorePropertiesArgs = parse_args(Tool::SetCoreProperties, args)?;

    let id = state
        .registry
        .resolve_id(args.presentation_id.as_deref())
        .ok_or_else(not_loaded)?;
    let handle = state.registry.get(Some(&id)).ok_or_else(not_loaded)?;
    let mut presentation = handle.write().await;
    presentation.set_core_properties(args.update());

    success(&PropertiesUpdated {
        presentation_id: id,
        message: "Core properties updated successfully",
        core_properties: presentation.core_properties(),
    })
}
