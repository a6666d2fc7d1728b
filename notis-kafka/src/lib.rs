//! # **notis** 的 Kafka 实现
//!
//! 以`auto.offset.reset=earliest`订阅单个主题，
//! 只有写入追踪文件并处理完成的记录偏移才会被自动提交。

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod errors;
pub mod source;

pub use app::App;
pub use config::HistoryConfig;
pub use source::KafkaSource;
