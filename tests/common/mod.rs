//! 集成测试共用工具：内存数据库、桩 OAuth 客户端与 HTTP 请求辅助

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;
use tower::ServiceExt;

use social_login::api::{AppState, LoginServer};
use social_login::app::AppContext;
use social_login::config::AppConfig;
use social_login::oauth::config::{FACEBOOK_AUTHORIZE_URL, GOOGLE_AUTHORIZE_URL};
use social_login::oauth::{
    CallbackParams, ExternalIdentity, OAuth2Result, OAuthClient, Provider, ProviderRegistry,
    RedirectTarget,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// 单连接内存库，已执行迁移
pub async fn test_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("连接内存数据库失败");
    Migrator::up(&db, None).await.expect("数据库迁移失败");
    Arc::new(db)
}

/// 带凭据的测试配置
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    config.auth.jwt_expires_in = 3600;
    for provider in Provider::ALL {
        let section = config.oauth.get_mut(provider);
        section.client_id = format!("{provider}-client-id");
        section.client_secret = format!("{provider}-client-secret");
    }
    config
}

/// 桩客户端：授权码即身份描述 `email[;name[;avatar]]`
#[derive(Debug, Clone, Copy)]
pub struct StubOAuthClient {
    provider: Provider,
}

impl StubOAuthClient {
    pub const fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl OAuthClient for StubOAuthClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn authorization_url(&self) -> OAuth2Result<RedirectTarget> {
        let endpoint = match self.provider {
            Provider::Facebook => FACEBOOK_AUTHORIZE_URL,
            Provider::Google => GOOGLE_AUTHORIZE_URL,
        };
        Ok(RedirectTarget::new(format!(
            "{endpoint}?response_type=code&client_id={}-client-id",
            self.provider
        )))
    }

    async fn fetch_identity(&self, params: &CallbackParams) -> OAuth2Result<ExternalIdentity> {
        let code = params.authorization_code(self.provider)?;
        let mut parts = code.split(';');
        let email = parts.next().unwrap_or_default().to_string();
        let name = parts
            .next()
            .map_or_else(|| format!("{} user", self.provider), ToString::to_string);
        let avatar_url = parts.next().map(ToString::to_string);

        Ok(ExternalIdentity {
            provider: self.provider,
            external_id: format!("{}-{email}", self.provider),
            name,
            email,
            avatar_url,
        })
    }
}

/// 两个渠道都使用桩客户端的注册表
pub fn stub_registry() -> ProviderRegistry {
    Provider::ALL
        .into_iter()
        .fold(ProviderRegistry::new(), |registry, provider| {
            registry.with_client(Arc::new(StubOAuthClient::new(provider)))
        })
}

pub async fn test_context_with(registry: ProviderRegistry) -> Arc<AppContext> {
    let context = AppContext::new(Arc::new(test_config()), test_db().await, registry)
        .expect("装配应用上下文失败");
    Arc::new(context)
}

pub async fn test_context() -> Arc<AppContext> {
    test_context_with(stub_registry()).await
}

pub fn router(context: &Arc<AppContext>) -> Router {
    LoginServer::create_router(AppState::new(Arc::clone(context)), &context.config.server)
}

/// 一次请求的结果
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    get_with_headers(router, uri, &[]).await
}

pub async fn get_with_headers(router: &Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::empty()).expect("构建请求失败");

    let response = router.clone().oneshot(request).await.expect("请求失败");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("读取响应体失败");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn user_count(context: &AppContext) -> u64 {
    entity::Users::find()
        .count(context.db.as_ref())
        .await
        .expect("统计用户失败")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}

pub fn callback_uri(provider: &str, code: &str) -> String {
    let mut url = url::Url::parse("http://localhost").expect("基础地址无效");
    url.set_path(&format!("/api/login/{provider}/callback"));
    url.query_pairs_mut()
        .append_pair("code", code)
        .append_pair("state", "ignored");
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}
