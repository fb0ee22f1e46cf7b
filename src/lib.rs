//! # Social Login
//!
//! Facebook / Google 社交登录后端：跳转到身份提供商、处理回调，
//! 并按邮箱复用或创建本地账号。

pub mod accounts;
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod login;
pub mod oauth;

pub use config::AppConfig;
pub use error::{AppError, Result};
