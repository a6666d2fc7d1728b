use domain::user::{NoticeSettings, UserCreatedHandler, UserDeletedHandler};
use notis::registry::HandlerRegistry;
use notis_kafka::{HistoryConfig, app};
use std::process::ExitCode;
use tracing::{Span, error, info, info_span};
use tracing_appender::non_blocking;
use tracing_subscriber::{EnvFilter, fmt};

fn registry(cfg: &HistoryConfig, parent: &Span) -> HandlerRegistry {
    let settings = NoticeSettings::new(&cfg.template_root, &cfg.output_dir);
    let mut registry = HandlerRegistry::new();
    registry.register(UserCreatedHandler::new(settings.clone(), parent));
    registry.register(UserDeletedHandler::new(settings, parent));
    registry
}

#[tokio::main]
async fn main() -> ExitCode {
    let (non_blocking, _guard) = non_blocking(std::io::stdout());
    fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cfg = match HistoryConfig::load(env!("CARGO_MANIFEST_DIR")) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!("启动历史事件消费者：{}", cfg.group_id);

    let span = info_span!("kafka_history", group_id = %cfg.group_id);
    let ctx = app::context();
    match ctx.launch(&cfg, registry(&cfg, &span)).await {
        Ok(summary) => {
            info!(?summary, "历史事件消费者已退出");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("历史事件消费者异常退出：{e}");
            ExitCode::FAILURE
        }
    }
}
