//! Action-style catalog endpoint: `/library/api.php?action=...`
//!
//! The verb and the `action` query parameter together select the operation.
//! Every response is a JSON object with a boolean `success` field; failures
//! add an `error` string and a 4xx/5xx status.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::book_service;

#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActionQuery {
    /// One of `list`, `get`, `create`, `update`, `delete`
    pub action: Option<String>,
    /// Book id, required by `get`, `update` and `delete`
    pub id: Option<String>,
}

impl ActionQuery {
    /// Fold decoded query pairs; a repeated key keeps its last value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "action" => query.action = Some(value),
                "id" => query.id = Some(value),
                _ => {}
            }
        }
        query
    }

    fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }
}

/// Ids that are not integers cannot match a record
fn parse_id(raw: &str) -> Result<i32, DomainError> {
    raw.trim().parse().map_err(|_| DomainError::NotFound)
}

fn error_response(operation: &str, err: DomainError) -> Response {
    let (status, message) = match err {
        DomainError::NotFound => (StatusCode::NOT_FOUND, "Book not found".to_string()),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        DomainError::Database(msg) => {
            tracing::error!("Failed to {}: {}", operation, msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}: {}", operation, msg),
            )
        }
    };

    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn invalid_endpoint() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Invalid endpoint" })),
    )
        .into_response()
}

/// Route a request to the operation named by its verb and `action`
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let query = match pairs {
        Ok(Query(pairs)) => ActionQuery::from_pairs(pairs),
        Err(e) => {
            tracing::debug!("Rejected query string: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "Invalid query string" })),
            )
                .into_response();
        }
    };

    match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::GET => read_books(&state, &query).await,
        Method::POST => write_books(&state, &query, &body).await,
        Method::DELETE => remove_book(&state, &query).await,
        _ => invalid_endpoint(),
    }
}

#[utoipa::path(
    get,
    path = "/library/api.php",
    params(ActionQuery),
    responses(
        (status = 200, description = "`list`: {success, data: Book[]}; `get`: {success, data: Book}"),
        (status = 404, description = "Book not found or invalid endpoint"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn read_books(state: &AppState, query: &ActionQuery) -> Response {
    match (query.action(), query.id.as_deref()) {
        ("list", _) => match book_service::list_books(state.book_repo.as_ref()).await {
            Ok(books) => Json(json!({ "success": true, "data": books })).into_response(),
            Err(e) => error_response("fetch books", e),
        },
        ("get", Some(raw_id)) => {
            let result = match parse_id(raw_id) {
                Ok(id) => book_service::get_book(state.book_repo.as_ref(), id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(book) => Json(json!({ "success": true, "data": book })).into_response(),
                Err(e) => error_response("fetch book", e),
            }
        }
        _ => invalid_endpoint(),
    }
}

#[utoipa::path(
    post,
    path = "/library/api.php",
    params(ActionQuery),
    request_body = crate::models::BookInput,
    responses(
        (status = 200, description = "`create`: {success, message, id}; `update`: {success, message}"),
        (status = 400, description = "Invalid JSON, missing title/author, or nothing to update"),
        (status = 404, description = "Book not found or invalid endpoint"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn write_books(state: &AppState, query: &ActionQuery, body: &[u8]) -> Response {
    let repo = state.book_repo.as_ref();

    match (query.action(), query.id.as_deref()) {
        ("create", _) => match book_service::create_book(repo, body).await {
            Ok(book) => Json(json!({
                "success": true,
                "message": "Book created successfully",
                "id": book.id
            }))
            .into_response(),
            Err(e) => error_response("create book", e),
        },
        ("update", Some(raw_id)) => {
            let result = match parse_id(raw_id) {
                Ok(id) => book_service::update_book(repo, id, body).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(_) => Json(json!({
                    "success": true,
                    "message": "Book updated successfully"
                }))
                .into_response(),
                Err(e) => error_response("update book", e),
            }
        }
        _ => invalid_endpoint(),
    }
}

#[utoipa::path(
    delete,
    path = "/library/api.php",
    params(ActionQuery),
    responses(
        (status = 200, description = "{success, message}"),
        (status = 404, description = "Book not found or invalid endpoint"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn remove_book(state: &AppState, query: &ActionQuery) -> Response {
    let raw_id = match (query.action(), query.id.as_deref()) {
        ("delete", Some(raw_id)) => raw_id,
        _ => return invalid_endpoint(),
    };

    let result = match parse_id(raw_id) {
        Ok(id) => book_service::delete_book(state.book_repo.as_ref(), id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Book deleted successfully"
        }))
        .into_response(),
        Err(e) => error_response("delete book", e),
    }
}
