//! # 分层配置
//!
//! 依次加载`default`、`<env>`配置文件与`NOTIS__`前缀的环境变量。

use crate::errors::ConfigError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use validator::Validate;

/// 配置目录，取环境变量`NOTIS_CONFIG_ROOT`，缺省为`<crate_dir>/config`
pub fn config_root(crate_dir: impl AsRef<Path>) -> PathBuf {
    std::env::var("NOTIS_CONFIG_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| crate_dir.as_ref().join("config"))
}

/// 环境名，取环境变量`NOTIS_ENV`，缺省为`dev`
pub fn config_env() -> String {
    std::env::var("NOTIS_ENV").unwrap_or_else(|_| "dev".to_string())
}

/// 构建配置，目录与环境名见 [`config_root`]、[`config_env`]
pub fn build_config(crate_dir: impl AsRef<Path>) -> Result<Config, ConfigError> {
    build_config_from(&config_root(crate_dir), &config_env())
}

/// 从指定目录与环境名构建配置
pub fn build_config_from(config_root: &Path, env: &str) -> Result<Config, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(config_root.join("default")).required(false))
        .add_source(File::from(config_root.join(env)).required(false))
        .add_source(
            Environment::with_prefix("NOTIS")
                .separator("__")
                .list_separator(","),
        )
        .build()?;
    Ok(config)
}

/// 反序列化并验证配置
///
/// `section`为空时读取整个配置。
pub fn load_section<T>(config: &Config, section: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = match section {
        "" => config.clone().try_deserialize()?,
        s => config.get(s)?,
    };
    value.validate().map_err(|e| ConfigError::Validation {
        section: match section {
            "" => "root".to_string(),
            s => s.to_string(),
        },
        message: e.to_string(),
    })?;
    Ok(value)
}
