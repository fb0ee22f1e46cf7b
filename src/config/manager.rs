//! # 配置管理器
//!
//! 加载 TOML 配置文件并应用 `SOCIAL_LOGIN_` 前缀的环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::AppConfig;
use crate::error::{AppError, Result};
use crate::oauth::Provider;

/// 环境变量覆盖前缀
pub const ENV_PREFIX: &str = "SOCIAL_LOGIN_";
/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "SOCIAL_LOGIN_CONFIG_PATH";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: Arc<AppConfig>,
    /// 配置文件路径
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 路径优先级：显式参数 > `SOCIAL_LOGIN_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`
    pub fn new(explicit_path: Option<&Path>) -> Result<Self> {
        let config_file = explicit_path.map_or_else(Self::default_config_path, Path::to_path_buf);
        Self::from_file(config_file)
    }

    /// 默认配置文件路径
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        PathBuf::from(format!("config/config.{env}.toml"))
    }

    /// 从指定文件创建配置管理器，应用进程环境变量覆盖
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_env(config_path, env::vars())
    }

    /// 从指定文件创建配置管理器，覆盖来自给定的变量集合
    pub fn from_file_with_env<I>(config_path: impl AsRef<Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config_path = config_path.as_ref();
        let mut config = Self::load_config_file(config_path)?;

        let env_overrides = Self::build_env_overrides(vars);
        Self::apply_env_overrides(&mut config, &env_overrides)?;

        config.fill_defaults();
        config.validate()?;

        info!("配置管理器初始化完成: {}", config_path.display());
        info!("- 环境变量覆盖: {} 个", env_overrides.len());

        Ok(Self {
            config: Arc::new(config),
            config_path: config_path.to_path_buf(),
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// 配置文件路径
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(AppError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            AppError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// `SOCIAL_LOGIN_DATABASE_URL` -> `database.url`
    pub fn build_env_overrides<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: HashMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key != CONFIG_PATH_ENV)
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|config_key| (config_key.to_lowercase().replace('_', "."), value))
            })
            .collect();

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!(
                "应用环境变量覆盖: {} = {}",
                path,
                if path.contains("secret") { "***" } else { value }
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将环境变量覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_value(path, value)?,
            ["server", "api", "prefix"] => config.server.api_prefix = value.to_string(),
            ["server", "enable", "cors"] => config.server.enable_cors = parse_value(path, value)?,
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = parse_value(path, value)?;
            }
            ["database", "connect", "timeout"] => {
                config.database.connect_timeout = parse_value(path, value)?;
            }
            ["auth", "jwt", "secret"] => config.auth.jwt_secret = value.to_string(),
            ["auth", "jwt", "expires", "in"] => {
                config.auth.jwt_expires_in = parse_value(path, value)?;
            }
            ["oauth", provider, field @ ..] => {
                let Ok(provider) = provider.parse::<Provider>() else {
                    warn!("未知的身份提供商，忽略环境变量覆盖: {}", path);
                    return Ok(());
                };
                let section = config.oauth.get_mut(provider);

                match field.join("_").as_str() {
                    "client_id" => section.client_id = value.to_string(),
                    "client_secret" => section.client_secret = value.to_string(),
                    "redirect_uri" => section.redirect_uri = value.to_string(),
                    "authorize_url" => section.authorize_url = value.to_string(),
                    "token_url" => section.token_url = value.to_string(),
                    "userinfo_url" => section.userinfo_url = value.to_string(),
                    "timeout_seconds" => section.timeout_seconds = parse_value(path, value)?,
                    "scopes" => {
                        section.scopes = value
                            .split([',', ' '])
                            .filter(|s| !s.is_empty())
                            .map(ToString::to_string)
                            .collect();
                    }
                    _ => warn!("未知的配置路径，忽略环境变量覆盖: {}", path),
                }
            }
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| AppError::config_with_source(format!("无效的配置值 {path}: {value}"), e))
}
