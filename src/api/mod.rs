pub mod books;
pub mod health;

use axum::{
    Router,
    routing::{any, get},
};

use crate::infrastructure::AppState;

/// Path of the action endpoint; matches the URL the mobile client is built against
pub const ACTION_ENDPOINT: &str = "/library/api.php";

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Catalog actions
        .route(ACTION_ENDPOINT, any(books::dispatch))
        // Health check
        .route("/api/health", get(health::health_check))
        .with_state(state)
}
