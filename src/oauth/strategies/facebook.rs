//! # Facebook 用户信息
//!
//! Graph API `/me?fields=id,name,email`，头像由用户ID拼出。

use reqwest::Client;
use serde::Deserialize;

use super::{display_name, read_user_info, require_email};
use crate::oauth::Provider;
use crate::oauth::client::ExternalIdentity;
use crate::oauth::error::{OAuth2Error, OAuth2Result};

/// Graph API 头像地址前缀
pub const FACEBOOK_GRAPH_URL: &str = "https://graph.facebook.com/v3.3";

const USER_FIELDS: &str = "id,name,email";

#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl FacebookUserInfo {
    fn into_identity(self) -> OAuth2Result<ExternalIdentity> {
        let email = require_email(Provider::Facebook, self.email)?;
        Ok(ExternalIdentity {
            provider: Provider::Facebook,
            avatar_url: Some(picture_url(&self.id)),
            name: display_name(self.name, &email),
            external_id: self.id,
            email,
        })
    }
}

/// 用户头像地址
#[must_use]
pub fn picture_url(user_id: &str) -> String {
    format!("{FACEBOOK_GRAPH_URL}/{user_id}/picture?type=normal")
}

/// 用访问令牌拉取 Facebook 身份
pub async fn fetch_identity(
    http_client: &Client,
    userinfo_url: &str,
    access_token: &str,
) -> OAuth2Result<ExternalIdentity> {
    let response = http_client
        .get(userinfo_url)
        .query(&[("fields", USER_FIELDS), ("access_token", access_token)])
        .send()
        .await
        .map_err(|e| {
            OAuth2Error::user_info_error(Provider::Facebook, format!("用户信息请求失败: {e}"))
        })?;

    read_user_info::<FacebookUserInfo>(Provider::Facebook, response)
        .await?
        .into_identity()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_graph_response() {
        let info: FacebookUserInfo = serde_json::from_str(
            r#"{"id":"10157","name":"Ada Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
        let identity = info.into_identity().unwrap();

        assert_eq!(identity.provider, Provider::Facebook);
        assert_eq!(identity.external_id, "10157");
        assert_eq!(identity.name, "Ada Lovelace");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://graph.facebook.com/v3.3/10157/picture?type=normal")
        );
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let info: FacebookUserInfo =
            serde_json::from_str(r#"{"id":"1","name":"No Mail"}"#).unwrap();
        let err = info.into_identity().unwrap_err();
        assert!(matches!(err, OAuth2Error::MissingEmail { .. }));
    }

    #[test]
    fn test_missing_name_falls_back_to_email() {
        let info: FacebookUserInfo =
            serde_json::from_str(r#"{"id":"1","email":"anon@example.com"}"#).unwrap();
        assert_eq!(info.into_identity().unwrap().name, "anon@example.com");
    }
}
