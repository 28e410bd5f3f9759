use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::analysis_dto::*},
    error::AppError,
};

/// 执行性格分析
pub async fn run_analysis(
    State(state): State<AppState>,
    Path((chat_key, user_id)): Path<(String, String)>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "分析请求: chat_key={}, user_id={}, force_refresh={}",
        chat_key, user_id, request.force_refresh
    );

    let result = state
        .analyzer
        .run_analysis(
            &chat_key,
            &user_id,
            request.days,
            request.max_messages,
            request.force_refresh,
        )
        .await?;

    Ok(Json(AnalysisResponse::from(result)))
}

/// 读取缓存的分析报告
pub async fn get_report(
    State(state): State<AppState>,
    Path((chat_key, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    debug!("报告请求: chat_key={}, user_id={}", chat_key, user_id);

    let result = state.analyzer.get_report(&chat_key, &user_id).await?;

    Ok(Json(AnalysisResponse::from(result)))
}

/// 清除缓存的分析结果
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Path((chat_key, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    debug!("清除缓存请求: chat_key={}, user_id={}", chat_key, user_id);

    state.analyzer.invalidate_cache(&chat_key, &user_id).await?;

    Ok(Json(InvalidateResponse {
        chat_key,
        user_id,
        cleared: true,
    }))
}
