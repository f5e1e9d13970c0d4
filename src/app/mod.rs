//! 应用层
//!
//! `AppContext` 在启动时构建一次，持有配置和连接池，并通过构造函数把它们
//! 注入到仓储和处理器中。

pub mod user;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::infrastructure::{DatabaseError, DatabaseManager, Settings};
use user::{AppState, PgUserRepository, UserService};

pub struct AppContext {
    pub settings: Arc<Settings>,
    pub database: DatabaseManager,
}

impl AppContext {
    /// 连接主数据库并构建上下文
    pub async fn initialize(settings: Settings) -> Result<Self, DatabaseError> {
        let database = DatabaseManager::connect(&settings.database()).await?;
        Ok(Self::new(settings, database))
    }

    pub fn new(settings: Settings, database: DatabaseManager) -> Self {
        Self {
            settings: Arc::new(settings),
            database,
        }
    }

    pub fn user_service(&self) -> UserService {
        let repository = PgUserRepository::new(self.database.get_pool().clone());
        UserService::new(Arc::new(repository))
    }

    pub fn router(&self) -> Router {
        build_router(AppState {
            user_service: self.user_service(),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    user::routes(state).layer(TraceLayer::new_for_http())
}
