//! DTO 模块
//!
//! REST API 的请求与响应数据结构。

pub mod analysis_dto;

pub use analysis_dto::{AnalysisResponse, AnalyzeRequest, InvalidateResponse};
