//! Content endpoint handlers.
//!
//! Both content routes accept every method; dispatch happens here so that
//! unsupported verbs still pass the configuration check and get the fixed 405
//! body.

use crate::error::{ApiError, ApiResult};
use crate::metrics::{self, StoreTimer};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use folio_core::config::StoreConfig;
use folio_core::{DocumentName, PageDocument, WriteAction};
use folio_store::{ContentStoreExt, WriteToken};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// PUT body.
#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub content: Value,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST body.
#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub filename: Option<String>,
    pub content: Value,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of successful writes.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Any method on `{base_path}`.
pub async fn content_collection(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    respond(&state, method, None, body).await
}

/// Any method on `{base_path}/{*filename}`; the name may contain `/`.
pub async fn content_document(
    State(state): State<AppState>,
    method: Method,
    Path(filename): Path<String>,
    body: Bytes,
) -> Response {
    respond(&state, method, Some(filename), body).await
}

async fn respond(state: &AppState, method: Method, filename: Option<String>, body: Bytes) -> Response {
    let response = match dispatch(state, &method, filename, &body).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(method = %method, error = %e, "Content request failed");
            e.into_response_with(state.config.server.status_codes)
        }
    };
    metrics::record_request(method.as_str(), response.status());
    response
}

async fn dispatch(
    state: &AppState,
    method: &Method,
    filename: Option<String>,
    body: &[u8],
) -> ApiResult<Response> {
    if *method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    ensure_configured(&state.config.store)?;
    tracing::info!(method = %method, filename = filename.as_deref().unwrap_or(""), "Content request");

    match *method {
        Method::GET => get_content(state, document_name(filename)?).await,
        Method::PUT => update_content(state, document_name(filename)?, body).await,
        Method::POST => create_content(state, body).await,
        Method::DELETE => delete_content(state, document_name(filename)?).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

fn ensure_configured(store: &StoreConfig) -> ApiResult<()> {
    let missing = store.missing_settings();
    if missing.is_empty() {
        return Ok(());
    }
    tracing::error!(missing = %missing.join(", "), "Missing or default store settings");
    Err(ApiError::Unconfigured { missing })
}

fn document_name(filename: Option<String>) -> ApiResult<DocumentName> {
    Ok(DocumentName::new(filename.unwrap_or_default())?)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    if body.is_empty() {
        return Err(ApiError::InvalidInput("Request body is required".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request body: {e}")))
}

/// Serialize content the way it is committed: two-space indent, key order kept.
fn render_content(state: &AppState, name: &DocumentName, content: &Value) -> ApiResult<Vec<u8>> {
    if state.config.server.validate_documents {
        PageDocument::parse(name.as_str(), content.clone())?;
    }
    serde_json::to_vec_pretty(content)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request body: {e}")))
}

fn write_response(status: StatusCode, action: WriteAction) -> Response {
    (
        status,
        Json(WriteResponse {
            success: true,
            message: action.success_message(),
        }),
    )
        .into_response()
}

async fn get_content(state: &AppState, name: DocumentName) -> ApiResult<Response> {
    let path = state.config.store.document_path(&name);
    let blob = {
        let _timer = StoreTimer::start("fetch_blob");
        state.store.fetch_blob(&path).await
    }
    .map_err(|e| ApiError::store(&e, format!("Failed to fetch file: {}", e.reason())))?;

    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], blob.content).into_response())
}

async fn update_content(state: &AppState, name: DocumentName, body: &[u8]) -> ApiResult<Response> {
    let request: UpdateContentRequest = parse_body(body)?;
    let path = state.config.store.document_path(&name);
    tracing::debug!(path = %path, "Updating document");

    let revision = {
        let _timer = StoreTimer::start("fetch_sha");
        state.store.begin_update(&path).await
    }
    .map_err(|e| {
        let status = e.status().map(|s| format!(" ({s})")).unwrap_or_default();
        ApiError::store(
            &e,
            format!(
                "Failed to fetch file SHA: {}{status}. Check if repo owner/name/branch/path are correct in the store configuration.",
                e.reason()
            ),
        )
    })?;
    tracing::debug!(path = %path, sha = %revision.sha(), "Found current revision");

    let content = render_content(state, &name, &request.content)?;
    let message = WriteAction::Update.message_or_default(&name, request.message.as_deref());
    let sha = {
        let _timer = StoreTimer::start("put_blob");
        state
            .store
            .commit_write(revision.into(), &content, &message)
            .await
    }
    .map_err(|e| ApiError::store(&e, format!("Failed to update file: {}", e.reason())))?;

    tracing::info!(filename = %name, sha = %sha, "Document updated");
    Ok(write_response(StatusCode::OK, WriteAction::Update))
}

async fn create_content(state: &AppState, body: &[u8]) -> ApiResult<Response> {
    let request: CreateContentRequest = parse_body(body)?;
    let name = document_name(request.filename)?;
    let path = state.config.store.document_path(&name);

    let token: WriteToken = {
        let _timer = StoreTimer::start("fetch_sha");
        state.store.begin_create(&path).await
    }
    .map_err(|e| ApiError::store(&e, e.reason()))?;

    let content = render_content(state, &name, &request.content)?;
    let message = WriteAction::Create.message_or_default(&name, request.message.as_deref());
    let sha = {
        let _timer = StoreTimer::start("put_blob");
        state.store.commit_write(token, &content, &message).await
    }
    .map_err(|e| ApiError::store(&e, format!("Failed to create file: {}", e.reason())))?;

    tracing::info!(filename = %name, sha = %sha, "Document created");
    Ok(write_response(StatusCode::CREATED, WriteAction::Create))
}

async fn delete_content(state: &AppState, name: DocumentName) -> ApiResult<Response> {
    let path = state.config.store.document_path(&name);

    let revision = {
        let _timer = StoreTimer::start("fetch_sha");
        state.store.begin_update(&path).await
    }
    .map_err(|e| ApiError::store(&e, format!("File not found: {}", e.reason())))?;

    let message = WriteAction::Delete.default_message(&name);
    let timer = StoreTimer::start("delete_blob");
    state
        .store
        .commit_delete(revision, &message)
        .await
        .map_err(|e| ApiError::store(&e, format!("Failed to delete file: {}", e.reason())))?;
    drop(timer);

    tracing::info!(filename = %name, "Document deleted");
    Ok(write_response(StatusCode::OK, WriteAction::Delete))
}
