//! # 事件历史消费者
//!
//! 单线程阻塞拉取循环：拉取、反序列化、写追踪、分发、确认偏移。
//! 同一时刻只有一条记录在处理中。
//!
//! 状态迁移：`Created → Running → Stopping → Stopped`。
//! 任何退出路径都会经过`Stopping`并关闭消息源。

use crate::{
    Payload, Record,
    domain::{Polled, Source},
    errors::ConsumerError,
    registry::{Dispatch, HandlerRegistry},
    trace::TraceSink,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tracing::{Span, debug, error, info, warn};

/// 消费者状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// 已构造，尚未订阅
    Created,
    /// 拉取循环运行中
    Running,
    /// 正在关闭订阅
    Stopping,
    /// 已释放全部资源
    Stopped,
}

/// 单条记录处理失败时的策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 记录日志后停止消费，记录偏移不提交
    #[default]
    Stop,
    /// 记录日志后确认该记录，继续下一条
    Skip,
}

/// 关闭信号
///
/// 消费循环在两条记录之间检查该信号，不会打断正在执行的处理器。
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    /// 构造函数
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出关闭信号，返回是否为首次发出
    pub fn trigger(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
    }

    /// 是否已发出关闭信号
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// 拉取的记录数，等于追踪文件行数
    pub pulled: u64,
    /// 由处理器处理的记录数
    pub handled: u64,
    /// 没有对应处理器的记录数
    pub unhandled: u64,
    /// 空消息体记录数
    pub empty: u64,
    /// 按`Skip`策略跳过的失败记录数
    pub skipped: u64,
}

/// 消费者设置
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// 追踪文件路径
    pub trace_file: PathBuf,
    /// 单次拉取的最长等待
    pub poll_timeout: Duration,
    /// 失败策略
    pub failure: FailurePolicy,
}

impl ConsumerSettings {
    /// 使用默认拉取超时与失败策略
    pub fn new(trace_file: impl Into<PathBuf>) -> Self {
        Self {
            trace_file: trace_file.into(),
            poll_timeout: Duration::from_millis(100),
            failure: FailurePolicy::default(),
        }
    }
}

/// 事件历史消费者
pub struct HistoryConsumer<S: Source> {
    source: S,
    registry: HandlerRegistry,
    settings: ConsumerSettings,
    shutdown: Shutdown,
    state: State,
    summary: Summary,
    span: Span,
}

impl<S: Source> HistoryConsumer<S> {
    /// 构造函数，不执行任何 I/O
    ///
    /// `span`作为消费者全部日志的父级。
    pub fn new(source: S, registry: HandlerRegistry, settings: ConsumerSettings, span: Span) -> Self {
        Self {
            source,
            registry,
            settings,
            shutdown: Shutdown::new(),
            state: State::Created,
            summary: Summary::default(),
            span,
        }
    }

    /// 使用外部关闭信号
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// 关闭信号句柄
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// 当前状态
    pub fn state(&self) -> State {
        self.state
    }

    /// 运行消费循环，直到收到关闭信号、消息源耗尽或发生致命错误
    ///
    /// 无论以何种方式退出，返回前消息源都已关闭。
    pub fn run(&mut self) -> Result<Summary, ConsumerError> {
        let span = self.span.clone();
        let _entered = span.enter();

        if self.state != State::Created {
            return Err(ConsumerError::InvalidState(self.state));
        }

        let result = match TraceSink::create(&self.settings.trace_file) {
            Ok(mut sink) => {
                self.state = State::Running;
                info!(
                    "开始消费历史事件，追踪文件：{}，已注册事件类型：{:?}",
                    sink.path().display(),
                    self.registry.event_types()
                );
                self.consume(&mut sink)
            }
            Err(e) => Err(e),
        };

        self.stop();
        match &result {
            Ok(summary) => info!(?summary, "停止消费"),
            Err(e) => error!(summary = ?self.summary, "消费异常终止：{e}"),
        }
        result.map(|_| self.summary)
    }

    fn consume(&mut self, sink: &mut TraceSink) -> Result<Summary, ConsumerError> {
        loop {
            if self.shutdown.is_triggered() {
                info!("收到关闭信号，开始优雅退出");
                break;
            }

            let record = match self.source.poll(self.settings.poll_timeout) {
                Ok(Polled::Record(record)) => record,
                Ok(Polled::Idle) => continue,
                Ok(Polled::End) => {
                    info!("消息源已耗尽");
                    break;
                }
                Err(e) => {
                    error!("拉取消息失败：{e}");
                    return Err(e.into());
                }
            };

            match self.process(sink, &record) {
                Ok(()) => self.source.ack(&record)?,
                Err(e) => {
                    error!(
                        topic = %record.topic,
                        partition = record.partition,
                        offset = record.offset,
                        raw = %record.raw(),
                        "记录处理失败：{e}"
                    );
                    let fatal = matches!(e, ConsumerError::Trace { .. })
                        || self.settings.failure == FailurePolicy::Stop;
                    if fatal {
                        return Err(e);
                    }
                    warn!(offset = record.offset, "跳过处理失败的记录");
                    self.summary.skipped += 1;
                    self.source.ack(&record)?;
                }
            }
        }
        Ok(self.summary)
    }

    fn process(&mut self, sink: &mut TraceSink, record: &Record) -> Result<(), ConsumerError> {
        let value = match record.value() {
            Ok(value) => value,
            Err(source) => {
                sink.append(&Value::String(record.raw().into_owned()))?;
                self.summary.pulled += 1;
                return Err(ConsumerError::Decode {
                    offset: record.offset,
                    source,
                });
            }
        };
        debug!("收到消息（offset={}）：{value}", record.offset);

        sink.append(&value)?;
        self.summary.pulled += 1;

        if value.is_null() {
            debug!(offset = record.offset, "空消息体，不分发");
            self.summary.empty += 1;
            return Ok(());
        }
        let Some(payload) = Payload::from_value(value) else {
            info!(offset = record.offset, "消息体不是 JSON 对象，不分发");
            self.summary.unhandled += 1;
            return Ok(());
        };

        let event_type = match payload.event_type().or(record.event_type.as_deref()) {
            Some(t) => t.to_owned(),
            None => {
                info!(offset = record.offset, "消息未声明事件类型，不分发");
                self.summary.unhandled += 1;
                return Ok(());
            }
        };

        match self.registry.dispatch(&event_type, &payload) {
            Ok(Dispatch::Handled) => {
                debug!(offset = record.offset, "{event_type} 事件处理完成");
                self.summary.handled += 1;
                Ok(())
            }
            Ok(Dispatch::NoHandler) => {
                info!(offset = record.offset, "{event_type} 事件没有注册处理器");
                self.summary.unhandled += 1;
                Ok(())
            }
            Err(source) => Err(ConsumerError::Handler {
                offset: record.offset,
                event_type,
                source,
            }),
        }
    }

    fn stop(&mut self) {
        if self.state == State::Stopped {
            return;
        }
        self.state = State::Stopping;
        self.source.close();
        self.state = State::Stopped;
        info!("关闭消费者订阅");
    }
}

impl<S: Source> Drop for HistoryConsumer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
