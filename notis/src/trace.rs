//! # 追踪文件
//!
//! 每条拉取到的记录写成一行 JSON，写入后立即刷新。

use crate::errors::ConsumerError;
use serde_json::Value;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// 只追加的单写者追踪文件
#[derive(Debug)]
pub struct TraceSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TraceSink {
    /// 创建追踪文件，已存在则清空
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ConsumerError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| ConsumerError::Trace {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// 追加一行并刷新到磁盘
    pub fn append(&mut self, value: &Value) -> Result<(), ConsumerError> {
        let line = value.to_string();
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush())
            .and_then(|_| self.writer.get_ref().sync_data())
            .map_err(|source| ConsumerError::Trace {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    /// 追踪文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}
