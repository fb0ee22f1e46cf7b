//! OAuth认证策略模块
//!
//! 通用授权码流程，以及各提供商用户信息接口的解析

pub mod facebook;
pub mod google;
pub mod oauth2;

pub use self::oauth2::OAuth2ProviderClient;

use reqwest::Response;
use serde::de::DeserializeOwned;

use super::Provider;
use super::error::{OAuth2Error, OAuth2Result};

/// 读取用户信息响应，非2xx视为提供商错误
pub(crate) async fn read_user_info<T: DeserializeOwned>(
    provider: Provider,
    response: Response,
) -> OAuth2Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OAuth2Error::user_info_error(
            provider,
            format!("获取用户信息失败 ({status}): {body}"),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| OAuth2Error::user_info_error(provider, format!("JSON解析失败: {e}")))
}

/// 提供商未给出名字时退回到邮箱
pub(crate) fn display_name(name: Option<String>, email: &str) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.to_string())
}

/// 空邮箱等同于缺失
pub(crate) fn require_email(provider: Provider, email: Option<String>) -> OAuth2Result<String> {
    email
        .filter(|e| !e.trim().is_empty())
        .ok_or(OAuth2Error::MissingEmail { provider })
}
