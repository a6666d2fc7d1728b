//! # **notis** 错误定义

use crate::consumer::State;
use std::{io, path::PathBuf};
use thiserror::Error;

/// 事件处理器错误
///
/// 缺失的载荷字段不会产生此错误，处理器以空字符串替代。
#[derive(Debug, Error)]
pub enum HandlerError {
    /// 模板资源读取失败
    #[error("读取模板'{}'失败：{source}", .path.display())]
    Template {
        /// 模板路径
        path: PathBuf,
        /// 底层错误
        source: io::Error,
    },
    /// 产物写入失败
    #[error("写入产物'{}'失败：{source}", .path.display())]
    Artifact {
        /// 产物路径
        path: PathBuf,
        /// 底层错误
        source: io::Error,
    },
}

/// 消息源错误
#[derive(Debug, Error)]
pub enum SourceError {
    /// 消息代理错误
    #[error("消息代理错误：{0}")]
    Broker(String),
    /// 消息源已关闭
    #[error("消息源已关闭")]
    Closed,
}

/// 消费者错误
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// 当前状态不允许启动
    #[error("消费者处于{0:?}状态，无法启动")]
    InvalidState(State),
    /// 追踪文件读写失败
    #[error("追踪文件'{}'写入失败：{source}", .path.display())]
    Trace {
        /// 追踪文件路径
        path: PathBuf,
        /// 底层错误
        source: io::Error,
    },
    /// 消息体反序列化失败
    #[error("偏移 {offset} 的消息体反序列化失败：{source}")]
    Decode {
        /// 消息偏移
        offset: u64,
        /// 底层错误
        source: serde_json::Error,
    },
    /// 处理器执行失败
    #[error("偏移 {offset} 的{event_type}事件处理失败：{source}")]
    Handler {
        /// 消息偏移
        offset: u64,
        /// 事件类型
        event_type: String,
        /// 底层错误
        source: HandlerError,
    },
    /// 消息源错误
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置构建或反序列化失败
    #[error("加载配置失败：{0}")]
    Build(#[from] config::ConfigError),
    /// 配置验证失败
    #[error("配置'{section}'验证失败：{message}")]
    Validation {
        /// 配置节
        section: String,
        /// 验证信息
        message: String,
    },
}
