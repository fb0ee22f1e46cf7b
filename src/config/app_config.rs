//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use crate::ensure_config;
use crate::error::Result;
use crate::oauth::OAuthProvidersConfig;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 访问令牌配置
    pub auth: AuthConfig,
    /// 身份提供商配置
    pub oauth: OAuthProvidersConfig,
}

/// HTTP服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// API路由前缀
    pub api_prefix: String,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// 允许的CORS来源，空表示任意来源
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: "/api".to_string(),
            enable_cors: true,
            cors_origins: Vec::new(),
        }
    }
}

/// 访问令牌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT签名密钥
    pub jwt_secret: String,
    /// 令牌有效期（秒）
    pub jwt_expires_in: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expires_in: 24 * 3600,
        }
    }
}

impl AppConfig {
    /// 补全各身份提供商留空的端点
    pub fn fill_defaults(&mut self) {
        self.oauth.fill_defaults();
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.server.port != 0, "无效的服务器端口: 0");
        ensure_config!(
            self.server.api_prefix.starts_with('/'),
            "api_prefix 必须以 / 开头: {}",
            self.server.api_prefix
        );

        ensure_config!(!self.database.url.is_empty(), "数据库URL不能为空");
        ensure_config!(
            self.database.max_connections > 0,
            "数据库最大连接数必须大于0"
        );

        ensure_config!(!self.auth.jwt_secret.is_empty(), "JWT密钥不能为空");
        ensure_config!(self.auth.jwt_expires_in > 0, "令牌有效期必须大于0");

        self.oauth.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test-secret".into();
        for provider in crate::oauth::Provider::ALL {
            let section = config.oauth.get_mut(provider);
            section.client_id = "id".into();
            section.client_secret = "secret".into();
        }
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.api_prefix, "/api");
        assert_eq!(config.auth.jwt_expires_in, 86400);
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_jwt_secret_rejected() {
        let mut config = valid_config();
        config.auth.jwt_secret.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT密钥不能为空"));
    }

    #[test]
    fn test_missing_provider_credentials_rejected() {
        let mut config = valid_config();
        config.oauth.google.client_secret.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("google 配置中缺少client_secret"));
    }

    #[test]
    fn test_api_prefix_must_be_absolute() {
        let mut config = valid_config();
        config.server.api_prefix = "api".into();
        assert!(config.validate().is_err());
    }
}
