//! 应用上下文
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::accounts::AccountResolver;
use crate::auth::{CredentialIssuer, JwtManager};
use crate::config::AppConfig;
use crate::database;
use crate::error::Result;
use crate::login::ProviderGateway;
use crate::logging::{LogComponent, LogStage};
use crate::oauth::ProviderRegistry;
use crate::linfo;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub jwt: Arc<JwtManager>,
    pub gateway: ProviderGateway,
}

impl AppContext {
    /// 用已有的数据库连接与提供商注册表装配上下文
    pub fn new(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        registry: ProviderRegistry,
    ) -> Result<Self> {
        let jwt = Arc::new(JwtManager::new(Arc::new(config.auth.clone()))?);
        let issuer: Arc<dyn CredentialIssuer> = jwt.clone();
        let resolver = AccountResolver::new(Arc::clone(&db), issuer);
        let gateway = ProviderGateway::new(registry, resolver);

        Ok(Self {
            config,
            db,
            jwt,
            gateway,
        })
    }

    /// 连接数据库、执行迁移并按配置创建提供商客户端
    pub async fn bootstrap(config: Arc<AppConfig>) -> Result<Self> {
        let db = database::init_database(&config.database).await?;
        database::run_migrations(&db).await?;

        let registry = ProviderRegistry::from_config(&config.oauth)?;
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::OAuth,
            "providers_registered",
            &format!("已注册登录渠道: {:?}", registry.providers())
        );

        Self::new(config, Arc::new(db), registry)
    }
}
