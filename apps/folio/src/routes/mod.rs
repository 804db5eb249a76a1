pub mod health;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::status::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/check-status/:portfolio_id",
            get(handlers::handle_check_status),
        )
        // Pollers historically request the trailing-slash form.
        .route(
            "/check-status/:portfolio_id/",
            get(handlers::handle_check_status),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
