//! # 模板资源
//!
//! 模板是人工可编辑的文本，其中`{{field}}`占位符按字面替换。

use crate::errors::HandlerError;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// 模板根目录，启动时解析一次
#[derive(Debug, Clone)]
pub struct TemplateRoot {
    root: PathBuf,
}

impl TemplateRoot {
    /// 构造函数
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 模板文件路径
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// 读取模板
    ///
    /// 每次调用都重新读取文件，模板修改无需重启。
    pub fn load(&self, name: &str) -> Result<Template, HandlerError> {
        Template::load(self.path(name))
    }
}

/// 已加载的模板
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// 从文件读取模板
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HandlerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| HandlerError::Template {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { source })
    }

    /// 从字符串构造模板
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// 按字面替换占位符
    ///
    /// 未列出的占位符保持原样。
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.source.clone();
        for (name, value) in vars {
            let token = format!("{{{{{name}}}}}");
            out = out.replace(&token, value);
        }
        out
    }
}
