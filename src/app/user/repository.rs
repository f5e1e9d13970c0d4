//! 用户仓储：把四种操作翻译成参数化 SQL

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::model::{User, UserInput};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user not found")]
    NotFound,

    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }

    /// 没有返回行时映射为 NotFound，其余错误带上操作上下文
    fn from_sqlx(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| match source {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            source => RepositoryError::Database { context, source },
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 插入新用户，id 由服务端生成
    async fn create(&self, input: UserInput) -> Result<User, RepositoryError>;

    async fn get(&self, id: &str) -> Result<User, RepositoryError>;

    /// 部分更新，零值字段保留原值
    async fn update(&self, id: &str, input: UserInput) -> Result<User, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

const INSERT_USER: &str = r#"
    INSERT INTO users (id, name, email, age)
    VALUES ($1, $2, $3, $4)
    RETURNING id, name, email, age
"#;

const SELECT_USER: &str = r#"
    SELECT id, name, email, age
    FROM users
    WHERE id = $1::uuid
"#;

const UPDATE_USER: &str = r#"
    UPDATE users
    SET name = COALESCE($2, name),
        email = COALESCE($3, email),
        age = COALESCE($4, age)
    WHERE id = $1::uuid
    RETURNING id, name, email, age
"#;

const DELETE_USER: &str = r#"
    DELETE FROM users
    WHERE id = $1::uuid
    RETURNING id
"#;

/// PostgreSQL 实现
///
/// id 以文本传入并在 SQL 中转换，格式错误的 id 会表现为数据库错误。
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: UserInput) -> Result<User, RepositoryError> {
        let id = Uuid::new_v4();
        debug!("Creating user {}", id);

        sqlx::query_as::<_, User>(INSERT_USER)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.age)
            .fetch_one(&self.pool)
            .await
            .map_err(|source| RepositoryError::Database {
                context: "failed to create user",
                source,
            })
    }

    async fn get(&self, id: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(SELECT_USER)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx("failed to fetch user"))
    }

    async fn update(&self, id: &str, input: UserInput) -> Result<User, RepositoryError> {
        let patch = input.into_patch();
        debug!("Updating user {} with {:?}", id, patch);

        sqlx::query_as::<_, User>(UPDATE_USER)
            .bind(id)
            .bind(patch.name)
            .bind(patch.email)
            .bind(patch.age)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx("failed to update user"))
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(DELETE_USER)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx("failed to delete user"))?;

        if deleted.is_nil() {
            return Err(RepositoryError::NotFound);
        }

        debug!("Deleted user {}", deleted);
        Ok(())
    }
}
