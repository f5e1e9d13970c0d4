//! 用户处理器
//!
//! 每个请求依次经过 解码 → 调用服务 → 编码，任一步失败立即返回错误响应。
//! 注意 update / delete 的任何失败（包括用户不存在）都返回 500，
//! 只有 get 返回 404。

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::error;

use super::{
    model::{User, UserInput},
    repository::RepositoryError,
    service::UserService,
};
use crate::core::{error::CoreError, extract::JsonBody, response::MessageResponse};

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

fn internal(message: &str, err: RepositoryError) -> CoreError {
    error!("{}: {}", message, err);
    CoreError::InternalServerError(message.to_string())
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<(StatusCode, Json<User>), CoreError> {
    let user = state
        .user_service
        .create_user(input)
        .await
        .map_err(|e| internal("Failed to create user", e))?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, CoreError> {
    let user = state.user_service.get_user(&id).await.map_err(|e| {
        if !e.is_not_found() {
            error!("Failed to fetch user {}: {}", id, e);
        }
        CoreError::NotFound("User not found".to_string())
    })?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<Json<User>, CoreError> {
    let user = state
        .user_service
        .update_user(&id, input)
        .await
        .map_err(|e| internal("Failed to update user", e))?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), CoreError> {
    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(|e| internal("Failed to delete user", e))?;

    Ok((
        StatusCode::NO_CONTENT,
        Json(MessageResponse::new("User deleted successfully")),
    ))
}
