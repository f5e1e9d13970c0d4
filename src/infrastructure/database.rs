//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Connection,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::config::{ConfigError, DatabaseSettings};

/// 连接池上限，同时也是空闲连接上限
pub const MAX_CONNECTIONS: u32 = 25;
/// 单个连接的最长存活时间
pub const MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

const CREATE_UUID_EXTENSION: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        age INTEGER NOT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("数据库配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("{context}: {source}")]
    Sql {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DatabaseError {
    fn sql(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Sql { context, source }
    }
}

#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 建立连接池，检查连通性，并确保 users 表存在
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        let options = settings.connect_options()?;

        info!("Connecting to database: {}", settings.redacted());

        // 空闲上限与连接上限相同，所以不设置 idle_timeout
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .max_lifetime(MAX_LIFETIME)
            .idle_timeout(None)
            .connect_with(options)
            .await
            .map_err(DatabaseError::sql("failed to open database connection"))?;

        let manager = Self { pool };
        manager.ping().await?;
        manager.ensure_schema().await?;

        info!("Database ready");
        Ok(manager)
    }

    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(DatabaseError::sql("failed to acquire connection"))?;

        conn.ping()
            .await
            .map_err(DatabaseError::sql("database ping failed"))
    }

    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        // 没有权限创建扩展时只记录警告；扩展确实缺失的话建表会失败
        if let Err(e) = sqlx::query(CREATE_UUID_EXTENSION).execute(&self.pool).await {
            warn!("Could not create uuid-ossp extension: {}", e);
        }

        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::sql("failed to create users table"))?;

        Ok(())
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 等待借出的连接归还后关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
