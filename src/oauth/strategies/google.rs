//! # Google 用户信息
//!
//! OpenID Connect userinfo 端点，Bearer 令牌认证。

use reqwest::Client;
use serde::Deserialize;

use super::{display_name, read_user_info, require_email};
use crate::oauth::Provider;
use crate::oauth::client::ExternalIdentity;
use crate::oauth::error::{OAuth2Error, OAuth2Result};

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_identity(self) -> OAuth2Result<ExternalIdentity> {
        let email = require_email(Provider::Google, self.email)?;
        Ok(ExternalIdentity {
            provider: Provider::Google,
            external_id: self.sub,
            name: display_name(self.name, &email),
            email,
            avatar_url: self.picture,
        })
    }
}

/// 用访问令牌拉取 Google 身份
pub async fn fetch_identity(
    http_client: &Client,
    userinfo_url: &str,
    access_token: &str,
) -> OAuth2Result<ExternalIdentity> {
    let response = http_client
        .get(userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| {
            OAuth2Error::user_info_error(Provider::Google, format!("用户信息请求失败: {e}"))
        })?;

    read_user_info::<GoogleUserInfo>(Provider::Google, response)
        .await?
        .into_identity()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_userinfo() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{
                "sub": "1098",
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "email_verified": true,
                "picture": "https://lh3.googleusercontent.com/a/photo.jpg"
            }"#,
        )
        .unwrap();
        let identity = info.into_identity().unwrap();

        assert_eq!(identity.provider, Provider::Google);
        assert_eq!(identity.external_id, "1098");
        assert_eq!(identity.email, "grace@example.com");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a/photo.jpg")
        );
    }

    #[test]
    fn test_blank_email_is_rejected() {
        let info: GoogleUserInfo =
            serde_json::from_str(r#"{"sub":"1","name":"x","email":"  "}"#).unwrap();
        assert!(matches!(
            info.into_identity().unwrap_err(),
            OAuth2Error::MissingEmail { .. }
        ));
    }
}
