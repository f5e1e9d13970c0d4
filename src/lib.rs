//! # 用户 CRUD 服务
//!
//! 基于 Axum + SQLx 的分层示例：
//! - `app`: 用户模块（handler → service → repository）和应用上下文
//! - `core`: 错误处理、请求体提取、请求日志中间件
//! - `infrastructure`: 配置、数据库连接管理、日志初始化

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppContext};
pub use infrastructure::{DatabaseManager, Settings};
