//! 用户业务服务
//!
//! 目前没有业务规则，所有调用原样转发给仓储；
//! 校验、鉴权等横切逻辑以后放在这里。

use std::sync::Arc;

use super::model::{User, UserInput};
use super::repository::{RepositoryError, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User, RepositoryError> {
        self.repository.create(input).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, RepositoryError> {
        self.repository.get(id).await
    }

    pub async fn update_user(&self, id: &str, input: UserInput) -> Result<User, RepositoryError> {
        self.repository.update(id, input).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), RepositoryError> {
        self.repository.delete(id).await
    }
}
