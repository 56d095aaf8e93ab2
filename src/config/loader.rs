use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "STEAMSEARCH_";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "STEAMSEARCH_CONFIG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（由低到高）：
    /// 1. 内置默认值
    /// 2. ./steamsearch.toml
    /// 3. ./steamsearch.yaml
    /// 4. 环境变量 STEAMSEARCH_*（嵌套字段用 `__` 分隔）
    ///
    /// 若设置了 STEAMSEARCH_CONFIG，则只读取该文件。
    pub fn load() -> Result<AppConfig, figment::Error> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load_from(PathBuf::from(path));
        }

        Self::base()
            .merge(Toml::file("steamsearch.toml"))
            .merge(Yaml::file("steamsearch.yaml"))
            .merge(Self::env())
            .extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = if is_yaml(&path) {
            Self::base().merge(Yaml::file(path))
        } else {
            Self::base().merge(Toml::file(path))
        };

        figment.merge(Self::env()).extract()
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::production()))
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX)
            .ignore(&["CONFIG"])
            .split("__")
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        let base_url = config.service.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::MissingBaseUrl);
        }

        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ConfigValidationError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigValidationError::InvalidBaseUrl(format!(
                "{}: unsupported scheme {}",
                base_url,
                parsed.scheme()
            )));
        }

        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigValidationError::InvalidLogLevel(
                config.logging.level.clone(),
            ));
        }

        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务地址未配置")]
    MissingBaseUrl,

    #[error("服务地址无效: {0}")]
    InvalidBaseUrl(String),

    #[error("日志级别无效: {0}")]
    InvalidLogLevel(String),
}
