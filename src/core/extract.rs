//! 请求体提取器

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::CoreError;

pub const INVALID_BODY: &str = "Invalid request body";

/// 宽松的 JSON 请求体
///
/// 与 `axum::Json` 不同，这里不检查 `Content-Type`，并且所有解码失败
/// （语法错误、类型不匹配、读取失败）统一返回 400。
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("failed to read request body: {}", e);
            CoreError::BadRequest(INVALID_BODY.to_string())
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!("failed to decode request body: {}", e);
            CoreError::BadRequest(INVALID_BODY.to_string())
        })
    }
}
