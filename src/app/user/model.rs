//! 用户数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// users 表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// 创建或更新用户的请求体
///
/// 缺失的字段按零值处理；客户端传入的 `id` 会被忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// 部分更新：`None` 表示保留数据库中的原值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl UserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// 零值（空字符串、0）视为“未提供”
    ///
    /// 因此无法通过更新把字段改成空字符串或 0。
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: Some(self.name).filter(|s| !s.is_empty()),
            email: Some(self.email).filter(|s| !s.is_empty()),
            age: Some(self.age).filter(|&a| a != 0),
        }
    }
}

impl UserPatch {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
    }
}
