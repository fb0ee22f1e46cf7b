//! # 认证模块
//!
//! 登录成功后签发访问凭证，并为受保护接口校验凭证。

pub mod jwt;
pub mod types;

use chrono::{DateTime, Utc};
use entity::users;

use crate::error::Result;

pub use jwt::JwtManager;
pub use types::{AuthContext, JwtClaims};

/// 访问凭证头名称
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// 签发给客户端的不透明访问凭证
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

/// 凭证签发者
pub trait CredentialIssuer: Send + Sync {
    /// 为已解析的本地用户签发凭证
    fn issue(&self, user: &users::Model) -> Result<Credential>;
}

/// 从 `Authorization` 头值中提取 Bearer 令牌
#[must_use]
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
