//! Tool listing and invocation routes.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Map, Value};
use tracing::debug;

use deckstore_shared::AppError;

use crate::AppState;
use crate::tools::{self, Tool, ToolSpec};

/// Creates the tool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
}

/// GET `/tools`
/// List every tool with its argument schema.
async fn list_tools() -> Json<Vec<ToolSpec>> {
    Json(tools::catalog())
}

/// POST `/tools/{name}`
/// Invoke a tool with a JSON object of keyword arguments.
///
/// Tool failures are reported in the body with `200 OK`; only an unknown tool
/// name changes the status.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let Some(tool) = Tool::from_name(&name) else {
        let err = AppError::NotFound(format!("unknown tool '{name}'"));
        return (StatusCode::NOT_FOUND, Json(tools::failure(&err))).into_response();
    };

    let args = match parse_body(&body) {
        Ok(args) => args,
        Err(err) => return (StatusCode::OK, Json(tools::failure(&err))).into_response(),
    };

    debug!(tool = tool.name(), "Invoking tool");
    (StatusCode::OK, Json(tools::invoke(&state, tool, args).await)).into_response()
}

/// An empty body means no arguments.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("request body is not valid JSON: {e}")))
}
