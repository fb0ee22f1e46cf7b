//! # OAuth2 授权码流程
//!
//! 基于 `oauth2` crate 的通用客户端：构建授权地址、用授权码换取访问令牌，
//! 再交给各提供商的用户信息解析。

use std::time::Duration;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
};

use super::{facebook, google};
use crate::oauth::Provider;
use crate::oauth::client::{CallbackParams, ExternalIdentity, OAuthClient, RedirectTarget};
use crate::oauth::config::ProviderConfig;
use crate::oauth::error::{OAuth2Error, OAuth2Result};

/// 已设置授权端点与令牌端点的客户端
type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// 生产环境使用的提供商客户端
#[derive(Debug)]
pub struct OAuth2ProviderClient {
    provider: Provider,
    client: ConfiguredClient,
    scopes: Vec<String>,
    userinfo_url: String,
    http_client: reqwest::Client,
}

impl OAuth2ProviderClient {
    /// 从提供商配置创建客户端
    pub fn new(provider: Provider, config: &ProviderConfig) -> OAuth2Result<Self> {
        let auth_url = AuthUrl::new(config.authorize_url.clone())
            .map_err(|e| OAuth2Error::config_error(format!("{provider} 授权URL无效: {e}")))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| OAuth2Error::config_error(format!("{provider} 令牌URL无效: {e}")))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| OAuth2Error::config_error(format!("{provider} 回调URL无效: {e}")))?;

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url)
            .set_auth_type(AuthType::RequestBody);

        // 令牌端点不应跟随重定向
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OAuth2Error::config_error(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            provider,
            client,
            scopes: config.scopes.clone(),
            userinfo_url: config.userinfo_url.clone(),
            http_client,
        })
    }

    async fn exchange_code(&self, code: &str) -> OAuth2Result<String> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| {
                let message = match &e {
                    RequestTokenError::ServerResponse(response) => response.to_string(),
                    other => other.to_string(),
                };
                OAuth2Error::token_exchange_error(self.provider, message)
            })?;

        Ok(token.access_token().secret().clone())
    }
}

#[async_trait]
impl OAuthClient for OAuth2ProviderClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn authorization_url(&self) -> OAuth2Result<RedirectTarget> {
        let (url, _state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .url();

        Ok(RedirectTarget::new(url.to_string()))
    }

    async fn fetch_identity(&self, params: &CallbackParams) -> OAuth2Result<ExternalIdentity> {
        let code = params.authorization_code(self.provider)?;
        let access_token = self.exchange_code(code).await?;

        match self.provider {
            Provider::Facebook => {
                facebook::fetch_identity(&self.http_client, &self.userinfo_url, &access_token).await
            }
            Provider::Google => {
                google::fetch_identity(&self.http_client, &self.userinfo_url, &access_token).await
            }
        }
    }
}
