//! HTTP transport — maps routes to record store operations.
//!
//! ## Routes
//!
//! - `GET /` — welcome banner.
//! - `GET /items` — list, optionally narrowed by `?filterBy=<field>&value=<v>`.
//! - `GET /items/:id` — one item, or JSON `null` when absent.
//! - `POST /items` — create; responds with the stored item.
//! - `PUT /items/touch-all` — stamp `updatedAt` on every item.
//! - `PUT /items/:id` — merge update; responds with an acknowledgment.
//! - `DELETE /items/:id` — delete; responds with an acknowledgment.
//! - `GET /document` — fixed PDF.
//!
//! Every request passes through the audit middleware before dispatch, so
//! the log line is written whether or not the operation succeeds.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::{header, request::Parts, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::audit::{AuditEntry, AuditLog};
use crate::error::StoreError;
use crate::pdf;
use crate::store::{Filter, RecordStore};

// Bodies larger than this are rejected before they reach the audit log.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub audit: Arc<AuditLog>,
}

/// Build the service router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/items", get(list_handler).post(create_handler))
        .route("/items/touch-all", put(touch_all_handler))
        .route(
            "/items/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/document", get(document_handler))
        .layer(middleware::from_fn_with_state(state.clone(), audit_middleware))
        .with_state(state)
}

/// Serve the catalog over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Records every inbound request before it reaches a handler. The body is
/// buffered so it can be logged and then handed back to the router. A body
/// that exceeds the cap is still logged (with a placeholder) before the
/// request is refused — every inbound request leaves exactly one line.
async fn audit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            state
                .audit
                .record(&entry_for(&parts, Value::String("<body too large>".into())));
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
    };

    let body_json = if bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    state.audit.record(&entry_for(&parts, body_json));

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

/// Build the audit entry for a request. The path component carries the raw
/// query string, matching the line format of the original access log.
fn entry_for(parts: &Parts, body: Value) -> AuditEntry {
    let path = match parts.uri.query() {
        Some(q) => format!("{}?{}", parts.uri.path(), q),
        None => parts.uri.path().to_string(),
    };
    let query = parts
        .uri
        .query()
        .map(query_to_json)
        .unwrap_or_else(|| json!({}));
    let origin = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    AuditEntry {
        method: parts.method.to_string(),
        path,
        query,
        body,
        origin,
    }
}

fn query_to_json(raw: &str) -> Value {
    let mut map = Map::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Value::Object(map)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(rename = "filterBy")]
    filter_by: Option<String>,
    value: Option<String>,
}

async fn welcome_handler() -> &'static str {
    "welcome to the PlayStation Network catalog API"
}

async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let filter = match (params.filter_by, params.value) {
        (Some(field), Some(value)) => Some(Filter { field, value }),
        _ => None,
    };
    match state.store.list(filter.as_ref()) {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.store.get_by_id(id) {
        // None serializes as JSON null — a missing id is not an error here
        Ok(item) => Json(item).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_handler(
    State(state): State<AppState>,
    Json(record): Json<Map<String, Value>>,
) -> Response {
    match state.store.create(record) {
        Ok(item) => Json(item).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<Map<String, Value>>,
) -> Response {
    match state.store.update(id, patch) {
        Ok(()) => Json(json!({ "message": "item updated" })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn touch_all_handler(State(state): State<AppState>) -> Response {
    match state.store.touch_all_updated_at() {
        Ok(stamp) => Json(json!({
            "message": "updatedAt set on all items",
            "updatedAt": stamp,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.store.delete_by_id(id) {
        Ok(()) => Json(json!({ "message": "item deleted" })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn document_handler() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"document.pdf\"",
            ),
        ],
        pdf::fixed_document(),
    )
        .into_response()
}

fn error_response(err: StoreError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_becomes_a_json_object() {
        assert_eq!(
            query_to_json("filterBy=Type&value=Game"),
            json!({ "filterBy": "Type", "value": "Game" })
        );
        assert_eq!(query_to_json(""), json!({}));
        assert_eq!(query_to_json("flag"), json!({ "flag": "" }));
    }
}
