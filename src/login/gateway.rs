//! # 登录渠道网关
//!
//! 校验渠道名并分派给对应的 OAuth 客户端：登录时返回授权跳转地址，
//! 回调时换取外部身份并交给账号解析器。网关本身不持有可变状态。

use std::sync::Arc;

use crate::accounts::{AccountResolver, ResolvedAccount};
use crate::error::{AppError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::oauth::{CallbackParams, OAuthClient, Provider, ProviderRegistry, RedirectTarget};
use crate::{ldebug, linfo, lwarn};

/// 回调处理结果：本地用户与签发的凭证
pub type LoginOutcome = ResolvedAccount;

/// 登录渠道网关
#[derive(Debug, Clone)]
pub struct ProviderGateway {
    registry: ProviderRegistry,
    resolver: AccountResolver,
}

impl ProviderGateway {
    #[must_use]
    pub const fn new(registry: ProviderRegistry, resolver: AccountResolver) -> Self {
        Self { registry, resolver }
    }

    /// 账号解析器
    #[must_use]
    pub const fn resolver(&self) -> &AccountResolver {
        &self.resolver
    }

    /// 发起登录：返回提供商授权地址
    pub fn initiate_login(&self, provider_name: &str, request_id: &str) -> Result<RedirectTarget> {
        let client = self.client_for(provider_name, request_id)?;
        let target = client.authorization_url()?;

        ldebug!(
            request_id,
            LogStage::OAuthRedirect,
            LogComponent::Gateway,
            "authorization_url",
            &format!("跳转至 {} 授权页", client.provider())
        );
        Ok(target)
    }

    /// 处理回调：换取外部身份，解析本地用户并签发凭证
    pub async fn handle_callback(
        &self,
        provider_name: &str,
        params: &CallbackParams,
        request_id: &str,
    ) -> Result<LoginOutcome> {
        let client = self.client_for(provider_name, request_id)?;
        let provider = client.provider();

        let identity = client.fetch_identity(params).await.map_err(|e| {
            lwarn!(
                request_id,
                LogStage::OAuthCallback,
                LogComponent::Gateway,
                "fetch_identity_failed",
                &format!("{provider} 身份获取失败: {e}")
            );
            AppError::from(e)
        })?;

        let outcome = self.resolver.resolve(&identity).await?;

        linfo!(
            request_id,
            LogStage::AccountResolution,
            LogComponent::Gateway,
            "login_completed",
            &format!(
                "{provider} 登录完成: user_id={}, new_user={}",
                outcome.user.id, outcome.created
            )
        );
        Ok(outcome)
    }

    fn client_for(&self, provider_name: &str, request_id: &str) -> Result<Arc<dyn OAuthClient>> {
        let provider: Provider = provider_name.parse().map_err(|e| {
            ldebug!(
                request_id,
                LogStage::Request,
                LogComponent::Gateway,
                "unsupported_provider",
                &format!("拒绝未知渠道: {provider_name}")
            );
            AppError::from(e)
        })?;

        Ok(self.registry.get(provider)?)
    }
}
