#![allow(dead_code)]

use domain::user::NoticeSettings;
use notis::Payload;
use std::{path::PathBuf, sync::Once};
use tracing::{Level, info};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        fmt().with_test_writer().with_max_level(Level::DEBUG).init();
        info!("启用 {} 测试日志输出", Level::DEBUG);
    });
}

pub fn template_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn settings(output_dir: &std::path::Path) -> NoticeSettings {
    NoticeSettings::new(template_root(), output_dir)
}

pub fn payload(value: serde_json::Value) -> Payload {
    Payload::from_value(value).unwrap()
}
