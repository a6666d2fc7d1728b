//! 事件历史消费者配置

use notis::{
    config::{build_config_from, config_env, config_root, load_section},
    consumer::{ConsumerSettings, FailurePolicy},
    errors::ConfigError,
};
use rdkafka::ClientConfig;
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use validator::Validate;

/// 事件历史消费者配置
///
/// 各字段缺省时使用 [`HistoryConfig::default`] 的取值。
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct HistoryConfig {
    /// Kafka 集群地址
    #[validate(length(min = 1))]
    pub bootstrap: String,
    /// 订阅的主题
    #[validate(length(min = 1))]
    pub topic: String,
    /// 消费组
    #[validate(length(min = 1))]
    pub group_id: String,
    /// 追踪文件路径，相对当前工作目录
    pub trace_file: PathBuf,
    /// 产物输出目录，相对当前工作目录
    pub output_dir: PathBuf,
    /// 模板目录，相对路径以配置目录为基准，加载时解析为绝对路径
    pub template_root: PathBuf,
    /// 单次拉取的最长等待（毫秒）
    #[validate(range(min = 1, max = 60000))]
    pub poll_timeout_ms: u64,
    /// 单条记录处理失败时的策略
    pub failure: FailurePolicy,
    /// 透传给 Kafka 客户端的其余配置
    pub cc: HashMap<String, String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            bootstrap: "localhost:9092".to_string(),
            topic: "user-events".to_string(),
            group_id: "user-history".to_string(),
            trace_file: PathBuf::from("user_events_history.json"),
            output_dir: PathBuf::from("output"),
            template_root: PathBuf::from("templates"),
            poll_timeout_ms: 100,
            failure: FailurePolicy::Stop,
            cc: HashMap::new(),
        }
    }
}

impl HistoryConfig {
    /// 加载配置，配置目录缺省为`<crate_dir>/config`
    pub fn load(crate_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_from(&config_root(crate_dir), &config_env())
    }

    /// 从指定目录与环境名加载配置
    ///
    /// 模板目录在此解析一次，目录不存在时返回错误。
    pub fn load_from(config_root: &Path, env: &str) -> Result<Self, ConfigError> {
        let config = build_config_from(config_root, env)?;
        let mut cfg: Self = load_section(&config, "")?;
        cfg.template_root = resolve_dir(config_root, &cfg.template_root)?;
        debug!("模板目录：{}", cfg.template_root.display());
        Ok(cfg)
    }

    /// 消费者设置
    pub fn consumer_settings(&self) -> ConsumerSettings {
        ConsumerSettings {
            trace_file: self.trace_file.clone(),
            poll_timeout: Duration::from_millis(self.poll_timeout_ms),
            failure: self.failure,
        }
    }

    /// Kafka 消费者客户端配置
    ///
    /// 自动提交开启，但偏移只在记录确认后才存储，`cc`无法覆盖这些设置。
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        for (key, value) in &self.cc {
            config.set(key, value);
        }
        config
            .set("bootstrap.servers", &self.bootstrap)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false");
        debug!("消费者客户端配置：{:?}", config);
        config
    }
}

fn resolve_dir(base: &Path, dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = base.join(dir);
    match path.canonicalize() {
        Ok(resolved) if resolved.is_dir() => Ok(resolved),
        Ok(_) => Err(ConfigError::Validation {
            section: "template_root".to_string(),
            message: format!("'{}'不是目录", path.display()),
        }),
        Err(e) => Err(ConfigError::Validation {
            section: "template_root".to_string(),
            message: format!("'{}'无法访问：{e}", path.display()),
        }),
    }
}
