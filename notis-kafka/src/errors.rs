//! 错误定义

use notis::errors::{ConfigError, ConsumerError, SourceError};
use thiserror::Error;

/// Kafka 消息源错误
#[derive(Debug, Error)]
pub enum KafkaSourceError {
    /// 客户端错误
    #[error("Kafka错误：{0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
    /// 偏移无法转换为 Kafka 偏移
    #[error("偏移{0}超出范围")]
    Offset(u64),
}

impl From<KafkaSourceError> for SourceError {
    fn from(e: KafkaSourceError) -> Self {
        SourceError::Broker(e.to_string())
    }
}

/// 应用错误
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置加载失败
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// 创建消费者或订阅主题失败
    #[error("订阅失败：{0}")]
    Subscribe(#[from] KafkaSourceError),
    /// 消费循环异常终止
    #[error("{0}")]
    Consumer(#[from] ConsumerError),
    /// 阻塞任务被取消或崩溃
    #[error("消费任务异常退出：{0}")]
    Join(#[from] tokio::task::JoinError),
}
