//! Router configuration for the HTTP API.
//!
//! This module binds every route to its handler, adds request tracing and
//! creates the axum router ready for serving.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/articles/{id}",
            get(handlers::get_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route(
            "/articles/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/comments/{id}", delete(handlers::delete_comment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::from(Arc::new(LocalRepository::new()));
        let _router = create_router(state);
    }
}
