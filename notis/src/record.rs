use std::borrow::Cow;

/// 从消息日志拉取到的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 主题
    pub topic: String,
    /// 分区
    pub partition: i32,
    /// 分区内偏移
    pub offset: u64,
    /// 消息键
    pub key: Option<Vec<u8>>,
    /// 消息体
    pub payload: Option<Vec<u8>>,
    /// 消息头`event_type`的值
    pub event_type: Option<String>,
}

impl Record {
    /// 构造不带消息头的记录
    pub fn new(topic: impl Into<String>, partition: i32, offset: u64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            key: None,
            payload: None,
            event_type: None,
        }
    }

    /// 设置消息体
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// 设置消息头中的事件类型
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// 反序列化消息体，空消息体得到`null`
    pub fn value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self.payload.as_deref() {
            None | Some([]) => Ok(serde_json::Value::Null),
            Some(bytes) => serde_json::from_slice(bytes),
        }
    }

    /// 原始消息体，用于日志中的人工回放
    pub fn raw(&self) -> Cow<'_, str> {
        match self.payload.as_deref() {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => Cow::Borrowed("null"),
        }
    }
}
