//! Analysis Routes
//!
//! 定义性格分析相关的 API 路由。

use crate::api::handlers::analysis_handler::*;
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::app_state::AppState;

/// 创建分析路由器
pub fn create_analysis_router() -> Router<AppState> {
    Router::new()
        .route(
            "/chats/:chat_key/users/:user_id/analysis",
            post(run_analysis),
        )
        .route("/chats/:chat_key/users/:user_id/report", get(get_report))
        .route(
            "/chats/:chat_key/users/:user_id/cache",
            delete(invalidate_cache),
        )
}
