//! 事件历史消费者上下文

use crate::{config::HistoryConfig, errors::AppError, source::KafkaSource};
use notis::{
    consumer::{ConsumerSettings, HistoryConsumer, Shutdown, Summary},
    domain::Source,
    registry::HandlerRegistry,
};
use tracing::{Span, error, info, info_span};

/// 等待 Ctrl-C 或 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("监听 Ctrl-C 信号失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("监听 SIGTERM 信号失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl-C 信号"),
        _ = terminate => info!("收到 SIGTERM 信号"),
    }
}

/// 消费者上下文结构
pub struct App {
    shutdown: Shutdown,
}

/// 消费者上下文，收到退出信号时通知消费循环
pub fn context() -> App {
    let app = App::new();
    let shutdown = app.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        if shutdown.trigger() {
            info!("开始优雅退出，等待当前记录处理完成");
        }
    });
    app
}

impl App {
    /// 构造函数，不监听退出信号
    pub fn new() -> Self {
        Self {
            shutdown: Shutdown::new(),
        }
    }

    /// 关闭信号句柄
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// 订阅配置的主题并运行消费循环
    pub async fn launch(
        &self,
        cfg: &HistoryConfig,
        registry: HandlerRegistry,
    ) -> Result<Summary, AppError> {
        let span = info_span!("history_consumer", topic = %cfg.topic, group_id = %cfg.group_id);
        let source = span.in_scope(|| KafkaSource::subscribe(cfg))?;
        self.run(source, registry, cfg.consumer_settings(), span)
            .await
    }

    /// 在阻塞线程上运行消费循环
    pub async fn run<S>(
        &self,
        source: S,
        registry: HandlerRegistry,
        settings: ConsumerSettings,
        span: Span,
    ) -> Result<Summary, AppError>
    where
        S: Source + Send + 'static,
    {
        let mut consumer = HistoryConsumer::new(source, registry, settings, span)
            .with_shutdown(self.shutdown.clone());
        let summary = tokio::task::spawn_blocking(move || consumer.run()).await??;
        Ok(summary)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
