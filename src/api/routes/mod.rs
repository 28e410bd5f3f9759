//! API 路由模块

pub mod analysis_routes;
