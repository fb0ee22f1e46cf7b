//! OAuth2配置管理
//!
//! 每个身份提供商的客户端凭据与端点。端点留空时使用该提供商的默认值。

use serde::{Deserialize, Serialize};
use url::Url;

use super::Provider;
use super::error::{OAuth2Error, OAuth2Result};

pub const FACEBOOK_AUTHORIZE_URL: &str = "https://www.facebook.com/v3.3/dialog/oauth";
pub const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v3.3/oauth/access_token";
pub const FACEBOOK_USERINFO_URL: &str = "https://graph.facebook.com/v3.3/me";

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_REDIRECT_BASE: &str = "http://localhost:8080/api/login";

/// 单个身份提供商的OAuth2配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OAuth2客户端ID
    pub client_id: String,
    /// OAuth2客户端密钥
    pub client_secret: String,
    /// 回调地址，需与提供商后台登记的一致
    pub redirect_uri: String,
    /// 授权端点URL
    pub authorize_url: String,
    /// 令牌端点URL
    pub token_url: String,
    /// 用户信息端点URL
    pub userinfo_url: String,
    /// OAuth2作用域
    pub scopes: Vec<String>,
    /// 调用提供商接口的超时时间（秒）
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            authorize_url: String::new(),
            token_url: String::new(),
            userinfo_url: String::new(),
            scopes: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ProviderConfig {
    /// 指定提供商的默认配置（不含凭据）
    #[must_use]
    pub fn defaults_for(provider: Provider) -> Self {
        let mut config = Self::default();
        config.fill_defaults(provider);
        config
    }

    /// 用提供商默认值补全留空的字段
    pub fn fill_defaults(&mut self, provider: Provider) {
        let (authorize, token, userinfo, scopes): (&str, &str, &str, &[&str]) = match provider {
            Provider::Facebook => (
                FACEBOOK_AUTHORIZE_URL,
                FACEBOOK_TOKEN_URL,
                FACEBOOK_USERINFO_URL,
                &["email"],
            ),
            Provider::Google => (
                GOOGLE_AUTHORIZE_URL,
                GOOGLE_TOKEN_URL,
                GOOGLE_USERINFO_URL,
                &["openid", "profile", "email"],
            ),
        };

        if self.authorize_url.is_empty() {
            self.authorize_url = authorize.to_string();
        }
        if self.token_url.is_empty() {
            self.token_url = token.to_string();
        }
        if self.userinfo_url.is_empty() {
            self.userinfo_url = userinfo.to_string();
        }
        if self.scopes.is_empty() {
            self.scopes = scopes.iter().map(ToString::to_string).collect();
        }
        if self.redirect_uri.is_empty() {
            self.redirect_uri = format!("{DEFAULT_REDIRECT_BASE}/{provider}/callback");
        }
        if self.timeout_seconds == 0 {
            self.timeout_seconds = DEFAULT_TIMEOUT_SECONDS;
        }
    }

    /// 验证配置
    pub fn validate(&self, provider: Provider) -> OAuth2Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(OAuth2Error::config_error(format!(
                "{provider} 配置中缺少client_id"
            )));
        }
        if self.client_secret.trim().is_empty() {
            return Err(OAuth2Error::config_error(format!(
                "{provider} 配置中缺少client_secret"
            )));
        }

        for (field, value) in [
            ("redirect_uri", &self.redirect_uri),
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
            ("userinfo_url", &self.userinfo_url),
        ] {
            Url::parse(value).map_err(|e| {
                OAuth2Error::config_error(format!("{provider} 配置中 {field} 无效: {e}"))
            })?;
        }

        Ok(())
    }
}

/// 全部身份提供商配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthProvidersConfig {
    pub facebook: ProviderConfig,
    pub google: ProviderConfig,
}

impl Default for OAuthProvidersConfig {
    fn default() -> Self {
        Self {
            facebook: ProviderConfig::defaults_for(Provider::Facebook),
            google: ProviderConfig::defaults_for(Provider::Google),
        }
    }
}

impl OAuthProvidersConfig {
    #[must_use]
    pub const fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::Facebook => &self.facebook,
            Provider::Google => &self.google,
        }
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderConfig {
        match provider {
            Provider::Facebook => &mut self.facebook,
            Provider::Google => &mut self.google,
        }
    }

    /// 为所有提供商补全默认端点
    pub fn fill_defaults(&mut self) {
        for provider in Provider::ALL {
            self.get_mut(provider).fill_defaults(provider);
        }
    }

    /// 验证所有提供商配置
    pub fn validate(&self) -> OAuth2Result<()> {
        Provider::ALL
            .into_iter()
            .try_for_each(|provider| self.get(provider).validate(provider))
    }
}
