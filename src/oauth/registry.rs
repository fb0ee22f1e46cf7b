//! 提供商 → OAuth客户端 注册表

use std::collections::HashMap;
use std::sync::Arc;

use super::client::OAuthClient;
use super::config::OAuthProvidersConfig;
use super::error::{OAuth2Error, OAuth2Result};
use super::strategies::OAuth2ProviderClient;
use super::Provider;

/// 构造时注入的提供商客户端集合，运行期只读
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<Provider, Arc<dyn OAuthClient>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置为全部受支持的提供商创建生产客户端
    pub fn from_config(config: &OAuthProvidersConfig) -> OAuth2Result<Self> {
        Provider::ALL
            .into_iter()
            .try_fold(Self::new(), |registry, provider| {
                let client = OAuth2ProviderClient::new(provider, config.get(provider))?;
                Ok(registry.with_client(Arc::new(client)))
            })
    }

    /// 注册客户端，同一提供商后注册的覆盖先注册的
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn OAuthClient>) -> Self {
        self.clients.insert(client.provider(), client);
        self
    }

    /// 获取提供商客户端
    pub fn get(&self, provider: Provider) -> OAuth2Result<Arc<dyn OAuthClient>> {
        self.clients
            .get(&provider)
            .cloned()
            .ok_or_else(|| OAuth2Error::config_error(format!("未配置 {provider} 的OAuth客户端")))
    }

    /// 已注册的提供商
    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.clients.keys().copied().collect();
        providers.sort_by_key(Provider::as_str);
        providers
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}
