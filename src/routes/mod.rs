//! Router assembly.

mod common;
mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application router: fixed routes, one route family per resource, tracing and body limit.
pub fn app(state: AppState, max_request_size_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state))
        .layer(RequestBodyLimitLayer::new(max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
}
