//! # 登录服务器
//!
//! Axum HTTP服务器，提供社交登录接口

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::request_id_middleware;
use crate::app::AppContext;
use crate::auth::ACCESS_TOKEN_HEADER;
use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 登录服务器
pub struct LoginServer {
    /// 配置
    config: ServerConfig,
    /// 路由器
    router: Router,
}

impl LoginServer {
    /// 创建新的登录服务器
    #[must_use]
    pub fn new(config: ServerConfig, context: Arc<AppContext>) -> Self {
        let router = Self::create_router(AppState::new(context), &config);
        Self { config, router }
    }

    /// 创建路由器
    pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
        let api_routes = super::routes::create_routes(state);

        let mut app = if config.api_prefix == "/" {
            Router::new().merge(api_routes)
        } else {
            Router::new().nest(&config.api_prefix, api_routes)
        }
        .route("/ping", get(super::handlers::system::ping_handler));

        let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

        if config.enable_cors {
            app = app.layer(service_builder.layer(Self::cors_layer(config)));
        } else {
            app = app.layer(service_builder);
        }

        app.layer(axum::middleware::from_fn(request_id_middleware))
    }

    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        let access_token = HeaderName::from_static(ACCESS_TOKEN_HEADER);
        let cors_layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                access_token.clone(),
            ])
            .expose_headers([access_token]);

        if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
            return cors_layer.allow_origin(Any);
        }

        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<std::result::Result<Vec<_>, _>>();

        match origins {
            Ok(origins) => cors_layer.allow_origin(origins),
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Startup,
                    LogComponent::ServerSetup,
                    "cors_config_fail",
                    &format!("Invalid CORS origin configuration: {e}, falling back to allow any")
                );
                cors_layer.allow_origin(Any)
            }
        }
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self.config.host.parse::<std::net::IpAddr>().map_err(|e| {
            AppError::config_with_source(format!("无效的监听地址: {}", self.config.host), e)
        })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// 启动服务器，收到 Ctrl-C 后优雅退出
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("Starting social login server on {addr}")
        );

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::server_start_with_source(format!("无法监听 {addr}"), e))?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::server_start_with_source("服务器运行错误", e))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "signal_handler_fail",
            &format!("无法监听关闭信号: {e}")
        );
        std::future::pending::<()>().await;
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::ServerSetup,
        "shutdown_signal",
        "收到关闭信号，停止接收新请求"
    );
}
