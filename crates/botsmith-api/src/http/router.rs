//! Axum router configuration with middleware.
//!
//! Routes live under `/api/v1/embed/`. Middleware: CORS (any origin, so
//! widgets on third-party pages can call in) and request tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::sessions::EmbedHost;

pub fn build_router(host: EmbedHost) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/embed/sessions", post(handlers::embed::open_session))
        .route("/embed/sessions/{id}", delete(handlers::embed::close_session))
        .route(
            "/embed/sessions/{id}/messages",
            get(handlers::embed::list_messages).post(handlers::embed::send_message),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(host)
}

/// GET /health - Liveness plus the number of open sessions.
async fn health_check(State(host): State<EmbedHost>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": host.session_count(),
    }))
}
