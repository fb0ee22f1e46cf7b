//! 身份提供商客户端抽象

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Provider;
use super::error::{OAuth2Error, OAuth2Result};

/// 登录跳转目标（提供商授权页地址）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub url: String,
}

impl RedirectTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

/// 提供商回调携带的查询参数
///
/// `state` 仅被接受，服务端不保存会话因此不做校验。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// 取出授权码。提供商返回的 `error` 优先于缺失的 `code`。
    pub fn authorization_code(&self, provider: Provider) -> OAuth2Result<&str> {
        if let Some(error) = &self.error {
            let reason = self
                .error_description
                .as_ref()
                .map_or_else(|| error.clone(), |desc| format!("{error}: {desc}"));
            return Err(OAuth2Error::AuthorizationDenied { provider, reason });
        }

        self.code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or(OAuth2Error::MissingAuthorizationCode { provider })
    }
}

/// 提供商认证后返回的外部身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalIdentity {
    pub provider: Provider,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// 单个身份提供商的OAuth客户端
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// 该客户端服务的提供商
    fn provider(&self) -> Provider;

    /// 构建授权跳转地址
    fn authorization_url(&self) -> OAuth2Result<RedirectTarget>;

    /// 用回调参数换取外部身份
    async fn fetch_identity(&self, params: &CallbackParams) -> OAuth2Result<ExternalIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_code_present() {
        let params = CallbackParams::with_code("abc");
        assert_eq!(params.authorization_code(Provider::Google).unwrap(), "abc");
    }

    #[test]
    fn test_authorization_code_missing_or_empty() {
        let err = CallbackParams::default()
            .authorization_code(Provider::Facebook)
            .unwrap_err();
        assert!(matches!(err, OAuth2Error::MissingAuthorizationCode { .. }));

        let err = CallbackParams::with_code("")
            .authorization_code(Provider::Facebook)
            .unwrap_err();
        assert!(matches!(err, OAuth2Error::MissingAuthorizationCode { .. }));
    }

    #[test]
    fn test_provider_error_wins_over_code() {
        let params = CallbackParams {
            code: Some("abc".into()),
            error: Some("access_denied".into()),
            error_description: Some("user cancelled".into()),
            ..CallbackParams::default()
        };

        match params.authorization_code(Provider::Google).unwrap_err() {
            OAuth2Error::AuthorizationDenied { reason, .. } => {
                assert_eq!(reason, "access_denied: user cancelled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
