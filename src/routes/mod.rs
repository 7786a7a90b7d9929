//! Router assembly.

pub mod common;
pub mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

async fn not_found() -> AppError {
    AppError::NotFound
}

/// The full application router: operational routes, entity CRUD, request
/// tracing, and a JSON 404 for anything unmatched. Literal routes win over
/// the `/:path_segment` capture, so /health stays reachable.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}
