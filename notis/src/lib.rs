//! # **notis** 核心库
//!
//! 从消息日志最早的记录开始回放事件流，按事件类型分发给对应的处理器，
//! 并为每条拉取到的记录写入持久的追踪文件。
//!
//! 消息代理的具体实现（如 Kafka）通过 [`domain::Source`] 特征接入。

#![warn(missing_docs)]

mod payload;
mod record;

pub mod config;
pub mod consumer;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod template;
pub mod trace;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use payload::Payload;
pub use record::Record;
