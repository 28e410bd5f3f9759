use crate::services::PersonalityAnalyzer;
use std::sync::Arc;

/// 应用状态，持有 REST 处理器共享的编排器
#[derive(Clone)]
pub struct AppState {
    /// 性格分析编排器
    pub analyzer: Arc<PersonalityAnalyzer>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analyzer", &"Arc<PersonalityAnalyzer>")
            .finish()
    }
}

impl AppState {
    /// 创建应用状态
    pub fn new(analyzer: Arc<PersonalityAnalyzer>) -> Self {
        Self { analyzer }
    }
}
