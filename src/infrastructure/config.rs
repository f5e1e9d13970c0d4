//! 配置加载
//!
//! 启动时从环境变量（以及可选的 `.env` 文件）读取一次，之后以不可变的
//! `Settings` 传递给各个组件。

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// 服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// HTTP 监听端口
    pub port: u16,
    /// 数据库主机
    pub db_host: String,
    /// 数据库端口
    pub db_port: u16,
    /// 数据库名称
    pub db_name: String,
    /// 数据库用户
    pub db_user: String,
    /// 数据库密码
    pub db_password: String,
    /// sslmode (disable, prefer, require ...)
    pub db_ssl: String,
    /// 测试数据库端口
    pub db_test_port: u16,
    /// 测试数据库名称
    pub db_test_name: String,
    /// 优雅关闭的最长等待时间
    pub shutdown_timeout: Duration,
    /// tracing 过滤规则 (RUST_LOG)
    pub log_filter: String,
}

/// 单个数据库的连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无效的 sslmode: {0}")]
    InvalidSslMode(String),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            db_host: "localhost".to_string(),
            db_port: 5444,
            db_name: "shaffra".to_string(),
            db_user: "shaffra".to_string(),
            db_password: String::new(),
            db_ssl: "disable".to_string(),
            db_test_port: 5442,
            db_test_name: "shaffratest".to_string(),
            shutdown_timeout: Duration::from_secs(10),
            log_filter: "info".to_string(),
        }
    }
}

/// 加载工作目录下的 `.env` 文件，返回加载到的路径
///
/// 文件不存在不算错误，已存在的环境变量不会被覆盖。
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

impl Settings {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用给定的查找函数构建配置，缺失或无法解析的值回落到默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);

        Self {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            db_host: string("DB_HOST", defaults.db_host),
            db_port: parse_var(&lookup, "DB_PORT").unwrap_or(defaults.db_port),
            db_name: string("DB_NAME", defaults.db_name),
            db_user: string("DB_USER", defaults.db_user),
            db_password: string("DB_PASSWORD", defaults.db_password),
            db_ssl: string("DB_SSL", defaults.db_ssl),
            db_test_port: parse_var(&lookup, "DB_TEST_PORT").unwrap_or(defaults.db_test_port),
            db_test_name: string("DB_TEST_NAME", defaults.db_test_name),
            shutdown_timeout: parse_var(&lookup, "SHUTDOWN_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_timeout),
            log_filter: string("RUST_LOG", defaults.log_filter),
        }
    }

    /// 主数据库
    pub fn database(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            name: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            ssl_mode: self.db_ssl.clone(),
        }
    }

    /// 测试数据库：与主库共用主机和账号，只替换端口和库名
    pub fn test_database(&self) -> DatabaseSettings {
        DatabaseSettings {
            port: self.db_test_port,
            name: self.db_test_name.clone(),
            ..self.database()
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|_| ConfigError::InvalidSslMode(self.ssl_mode.clone()))?;

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .ssl_mode(ssl_mode);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }

    /// 不含密码的连接描述，用于日志
    pub fn redacted(&self) -> String {
        format!(
            "{}@{}:{}/{} (sslmode={})",
            self.user, self.host, self.port, self.name, self.ssl_mode
        )
    }
}
