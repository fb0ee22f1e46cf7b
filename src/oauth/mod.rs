//! # OAuth 模块
//!
//! Facebook / Google 授权码流程：渠道识别、提供商配置、客户端抽象与生产实现。

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod strategies;

pub use client::{CallbackParams, ExternalIdentity, OAuthClient, RedirectTarget};
pub use config::{OAuthProvidersConfig, ProviderConfig};
pub use error::{OAuth2Error, OAuth2Result};
pub use provider::Provider;
pub use registry::ProviderRegistry;
pub use strategies::OAuth2ProviderClient;
