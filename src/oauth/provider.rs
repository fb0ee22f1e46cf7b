//! 登录渠道标识

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::OAuth2Error;

/// 受支持的身份提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Facebook,
    Google,
}

impl Provider {
    /// 全部受支持的渠道
    pub const ALL: [Self; 2] = [Self::Facebook, Self::Google];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 精确匹配（区分大小写），`Facebook` 不是合法渠道名
impl FromStr for Provider {
    type Err = OAuth2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(Self::Facebook),
            "google" => Ok(Self::Google),
            other => Err(OAuth2Error::unsupported_provider(other)),
        }
    }
}
