//! 用户模块

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub use handler::AppState;
pub use model::{User, UserInput, UserPatch};
pub use repository::{PgUserRepository, RepositoryError, UserRepository};
pub use service::UserService;

use crate::core::middleware::request_logging_middleware;

/// /api/users 路由，每个匹配到的请求都会经过请求日志中间件
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/users", post(handler::create_user))
        .route(
            "/api/users/:id",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user),
        )
        .route_layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
