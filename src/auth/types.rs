//! 认证相关数据结构

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 签发者
pub const JWT_ISSUER: &str = "social-login";
/// 受众
pub const JWT_AUDIENCE: &str = "social-login-users";

/// JWT 载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// 用户ID
    pub sub: String,
    /// 邮箱
    pub email: String,
    /// 用户名
    pub name: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
    /// JWT ID
    pub jti: String,
}

impl JwtClaims {
    /// 创建新的 JWT 载荷
    #[must_use]
    pub fn new(user_id: i32, email: String, name: String, expires_in_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            name,
            iat: now,
            exp: now + expires_in_seconds,
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 获取用户ID
    pub fn user_id(&self) -> Result<i32, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// 通过认证的请求上下文，由认证中间件注入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = JwtClaims::new(7, "a@example.com".into(), "A".into(), 3600);

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_unique_jti() {
        let a = JwtClaims::new(1, "a@example.com".into(), "A".into(), 60);
        let b = JwtClaims::new(1, "a@example.com".into(), "A".into(), 60);
        assert_ne!(a.jti, b.jti);
    }
}
