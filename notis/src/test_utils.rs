//! 测试工具

use crate::{
    Payload, Record,
    domain::{EventHandler, Polled, Source},
    errors::{HandlerError, SourceError},
};
use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

/// 内存消息源，记录耗尽后返回 [`Polled::End`]
#[derive(Debug, Default)]
pub struct MemorySource {
    records: VecDeque<Result<Record, SourceError>>,
    probe: SourceProbe,
}

/// 内存消息源的观测句柄
#[derive(Debug, Clone, Default)]
pub struct SourceProbe {
    acked: Arc<Mutex<Vec<u64>>>,
    closed: Arc<Mutex<u32>>,
}

impl SourceProbe {
    /// 已确认的偏移
    pub fn acked(&self) -> Vec<u64> {
        self.acked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// 关闭次数
    pub fn closed(&self) -> u32 {
        self.closed.lock().map(|c| *c).unwrap_or_default()
    }
}

impl MemorySource {
    /// 以主题`topic`下的 JSON 消息体构造，偏移从 0 递增
    pub fn from_payloads<'a>(topic: &str, payloads: impl IntoIterator<Item = &'a str>) -> Self {
        let records = payloads
            .into_iter()
            .enumerate()
            .map(|(i, p)| Record::new(topic, 0, i as u64).with_payload(p.as_bytes()))
            .collect();
        Self::new(records)
    }

    /// 构造函数
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter().map(Ok).collect(),
            probe: SourceProbe::default(),
        }
    }

    /// 追加一次拉取错误
    pub fn push_error(&mut self, error: SourceError) {
        self.records.push_back(Err(error));
    }

    /// 观测句柄
    pub fn probe(&self) -> SourceProbe {
        self.probe.clone()
    }
}

impl Source for MemorySource {
    fn poll(&mut self, _timeout: Duration) -> Result<Polled, SourceError> {
        match self.records.pop_front() {
            Some(Ok(record)) => Ok(Polled::Record(record)),
            Some(Err(e)) => Err(e),
            None => Ok(Polled::End),
        }
    }

    fn ack(&mut self, record: &Record) -> Result<(), SourceError> {
        if let Ok(mut acked) = self.probe.acked.lock() {
            acked.push(record.offset);
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Ok(mut closed) = self.probe.closed.lock() {
            *closed += 1;
        }
    }
}

/// 记录每次调用载荷的处理器
pub struct RecordingHandler {
    event_type: String,
    fail: bool,
    calls: Arc<Mutex<Vec<Payload>>>,
}

impl RecordingHandler {
    /// 构造函数
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_owned(),
            fail: false,
            calls: Arc::default(),
        }
    }

    /// 每次处理都返回模板缺失错误的处理器
    pub fn failing(event_type: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(event_type)
        }
    }

    /// 调用记录
    pub fn calls(&self) -> Arc<Mutex<Vec<Payload>>> {
        Arc::clone(&self.calls)
    }
}

impl EventHandler for RecordingHandler {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn handle(&self, payload: &Payload) -> Result<(), HandlerError> {
        if self.fail {
            return Err(HandlerError::Template {
                path: "missing.html".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(payload.clone());
        }
        Ok(())
    }
}
