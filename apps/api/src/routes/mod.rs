pub mod health;
pub mod positions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/positions", get(positions::handle_list_positions))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/selection",
            post(handlers::handle_selection),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/questions/draft",
            post(handlers::handle_draft_questions),
        )
        .route("/api/v1/sessions/:id/chat", post(handlers::handle_chat))
        .route(
            "/api/v1/sessions/:id/report",
            post(handlers::handle_export_report),
        )
        .with_state(state)
}
