//! # 请求处理器

pub mod social;
pub mod system;
pub mod users;

use chrono::NaiveDateTime;
use entity::users as user_entity;
use serde::Serialize;

/// 对外暴露的用户信息
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<user_entity::Model> for UserResponse {
    fn from(user: user_entity::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}
