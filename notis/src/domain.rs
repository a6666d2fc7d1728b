//! # **notis** 特征

use crate::{
    Payload, Record,
    errors::{HandlerError, SourceError},
};
use std::time::Duration;

/// 事件处理器特征
pub trait EventHandler: Send + Sync {
    /// 处理的事件类型，对同一实例恒定
    fn event_type(&self) -> &str;

    /// 处理一条事件载荷
    ///
    /// 可选字段缺失时必须以默认值替代，不得返回错误。
    fn handle(&self, payload: &Payload) -> Result<(), HandlerError>;
}

/// 一次拉取的结果
#[derive(Debug)]
pub enum Polled {
    /// 拉取到一条记录
    Record(Record),
    /// 等待超时，尚无新记录
    Idle,
    /// 消息源已耗尽，不会再有记录
    End,
}

/// 消息源特征
///
/// 消费循环唯一的阻塞点。
pub trait Source {
    /// 拉取下一条记录，最长阻塞`timeout`
    fn poll(&mut self, timeout: Duration) -> Result<Polled, SourceError>;

    /// 标记记录已追踪并处理，其偏移允许提交
    fn ack(&mut self, record: &Record) -> Result<(), SourceError>;

    /// 关闭订阅，释放代理端资源
    fn close(&mut self);
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn poll(&mut self, timeout: Duration) -> Result<Polled, SourceError> {
        (**self).poll(timeout)
    }

    fn ack(&mut self, record: &Record) -> Result<(), SourceError> {
        (**self).ack(record)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
