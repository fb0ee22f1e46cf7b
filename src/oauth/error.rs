//! OAuth2错误处理
//!
//! 定义与身份提供商交互过程中可能出现的错误类型

use thiserror::Error;

use super::Provider;

/// OAuth2专用错误类型
#[derive(Debug, Error)]
pub enum OAuth2Error {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 提供商不支持
    #[error("不支持的提供商: {0}")]
    UnsupportedProvider(String),

    /// 回调缺少授权码
    #[error("Authorization code is missing from the {provider} callback")]
    MissingAuthorizationCode { provider: Provider },

    /// 用户拒绝授权或提供商返回错误
    #[error("{provider} denied the authorization request: {reason}")]
    AuthorizationDenied { provider: Provider, reason: String },

    /// 提供商未返回邮箱
    #[error("{provider} did not return an email address for this account")]
    MissingEmail { provider: Provider },

    /// 令牌交换失败
    #[error("令牌交换失败: {message}")]
    TokenExchangeError { provider: Provider, message: String },

    /// 用户信息获取失败
    #[error("用户信息获取失败: {message}")]
    UserInfoError { provider: Provider, message: String },
}

impl OAuth2Error {
    /// 创建配置错误
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// 创建不支持的提供商错误
    pub fn unsupported_provider<S: Into<String>>(provider: S) -> Self {
        Self::UnsupportedProvider(provider.into())
    }

    /// 创建令牌交换错误
    pub fn token_exchange_error<S: Into<String>>(provider: Provider, msg: S) -> Self {
        Self::TokenExchangeError {
            provider,
            message: msg.into(),
        }
    }

    /// 创建用户信息错误
    pub fn user_info_error<S: Into<String>>(provider: Provider, msg: S) -> Self {
        Self::UserInfoError {
            provider,
            message: msg.into(),
        }
    }

    /// 出错的提供商（若可确定）
    #[must_use]
    pub const fn provider(&self) -> Option<&'static str> {
        match self {
            Self::ConfigError(_) | Self::UnsupportedProvider(_) => None,
            Self::MissingAuthorizationCode { provider }
            | Self::AuthorizationDenied { provider, .. }
            | Self::MissingEmail { provider }
            | Self::TokenExchangeError { provider, .. }
            | Self::UserInfoError { provider, .. } => Some(provider.as_str()),
        }
    }
}

/// OAuth2结果类型别名
pub type OAuth2Result<T> = Result<T, OAuth2Error>;
