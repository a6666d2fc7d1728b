use notis::{Payload, errors::HandlerError, template::TemplateRoot};
use std::{fs, path::PathBuf};

mod created;
mod deleted;

pub use created::{UserCreatedHandler, welcome_message};
pub use deleted::{UserDeletedHandler, goodbye_message};

/// 用户类型缺失或无法解析时的取值
pub const DEFAULT_USER_TYPE: i64 = 1;

/// 通知产物的模板与输出位置
#[derive(Debug, Clone)]
pub struct NoticeSettings {
    pub templates: TemplateRoot,
    pub output_dir: PathBuf,
}

impl NoticeSettings {
    pub fn new(template_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: TemplateRoot::new(template_root),
            output_dir: output_dir.into(),
        }
    }

    /// 产物路径：`<output_dir>/<prefix>_<id>.html`
    pub fn artifact_path(&self, prefix: &str, id: &str) -> PathBuf {
        let id: String = id
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{prefix}_{id}.html"))
    }

    /// 写入产物，输出目录按需创建，同名产物被覆盖
    pub(crate) fn write(&self, prefix: &str, id: &str, content: &str) -> Result<PathBuf, HandlerError> {
        let path = self.artifact_path(prefix, id);
        fs::create_dir_all(&self.output_dir)
            .and_then(|_| fs::write(&path, content))
            .map_err(|source| HandlerError::Artifact {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// 用户事件载荷中的字段，缺失时为空字符串
struct UserFields {
    id: String,
    name: String,
    email: String,
    datetime: String,
    user_type: i64,
}

impl From<&Payload> for UserFields {
    fn from(payload: &Payload) -> Self {
        Self {
            id: payload.text("id"),
            name: payload.text("name"),
            email: payload.text("email"),
            datetime: payload.text("datetime"),
            user_type: payload.parse_or("user_type_id", DEFAULT_USER_TYPE),
        }
    }
}
