//! # 日志配置模块
//!
//! 基于 `tracing` 的日志初始化，以及带阶段/组件字段的结构化日志宏。
//!
//! ```ignore
//! linfo!(request_id, LogStage::OAuthCallback, LogComponent::Gateway, "callback_ok", "回调处理完成");
//! ```

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 请求处理所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    Startup,
    Shutdown,
    Configuration,
    Request,
    OAuthRedirect,
    OAuthCallback,
    AccountResolution,
    Authentication,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Request => "request",
            Self::OAuthRedirect => "oauth_redirect",
            Self::OAuthCallback => "oauth_callback",
            Self::AccountResolution => "account_resolution",
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    Main,
    ServerSetup,
    Config,
    Database,
    OAuth,
    Gateway,
    AccountResolver,
    Auth,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::ServerSetup => "server_setup",
            Self::Config => "config",
            Self::Database => "database",
            Self::OAuth => "oauth",
            Self::Gateway => "gateway",
            Self::AccountResolver => "account_resolver",
            Self::Auth => "auth",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __structured_log {
    ($level:ident, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr) => {
        ::tracing::$level!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            "{}",
            $message
        )
    };
}

/// 结构化 info 日志
#[macro_export]
macro_rules! linfo {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        $crate::__structured_log!(info, $request_id, $stage, $component, $operation, $message)
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        $crate::__structured_log!(warn, $request_id, $stage, $component, $operation, $message)
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        $crate::__structured_log!(error, $request_id, $stage, $component, $operation, $message)
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        $crate::__structured_log!(debug, $request_id, $stage, $component, $operation, $message)
    };
}

/// 默认过滤规则：屏蔽 SQLx 逐条查询日志
fn default_filter(level: &str) -> String {
    format!("{level},social_login=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先于 `log_level`。重复调用不会 panic。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok();

    if initialized
        && env::var("RUST_LOG").is_ok_and(|v| {
            v.contains("sqlx::query=info") || v.contains("sqlx::query=debug")
        })
    {
        tracing::info!("🔍 SQLx database query logging enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_silences_sqlx_queries() {
        let filter = default_filter("warn");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("sqlx::query=off"));
        assert!(filter.contains("social_login=debug"));
    }

    #[test]
    fn test_stage_and_component_display() {
        assert_eq!(LogStage::OAuthCallback.to_string(), "oauth_callback");
        assert_eq!(LogComponent::AccountResolver.to_string(), "account_resolver");
    }

    #[test]
    fn test_macros_expand() {
        linfo!("req-1", LogStage::Startup, LogComponent::Main, "boot", "starting");
        lwarn!("req-1", LogStage::Startup, LogComponent::Main, "boot", &format!("{} warn", 1));
        ldebug!("req-1", LogStage::Startup, LogComponent::Main, "boot", "debug");
        lerror!("req-1", LogStage::Shutdown, LogComponent::Main, "halt", "error");
    }
}
