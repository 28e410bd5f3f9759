//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use axum::Router;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new().merge(routes::analysis_routes::create_analysis_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(app_state)
}
