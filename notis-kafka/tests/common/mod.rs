#![allow(dead_code)]

use std::{path::Path, sync::Once};
use tracing::{Level, info};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        fmt().with_test_writer().with_max_level(Level::DEBUG).init();
        info!("启用 {} 测试日志输出", Level::DEBUG);
    });
}

pub fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}
