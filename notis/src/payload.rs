use serde_json::{Map, Value};
use std::str::FromStr;

/// 事件载荷
///
/// 字段名到 JSON 标量的扁平映射。核心不强制任何字段结构，
/// 访问缺失字段时总是退化为默认值而不是报错。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// 从 JSON 值构造，非对象返回 None
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// 字符串字段
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// 字段的文本形式
    ///
    /// 字符串原样返回，数字和布尔值转为文本，数组和对象序列化为紧凑 JSON，
    /// 缺失或`null`返回空字符串。
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// 解析字段，缺失、为空或无法解析时返回默认值
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        let text = self.text(key);
        match text.trim() {
            "" => default,
            s => s.parse().unwrap_or(default),
        }
    }

    /// 用于路由的事件类型，依次查找`event_type`与`event`字段
    pub fn event_type(&self) -> Option<&str> {
        self.get_str("event_type").or_else(|| self.get_str("event"))
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        Payload::from_value(value).unwrap()
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Payload::from_value(json!([1, 2])).is_none());
        assert!(Payload::from_value(json!("UserCreated")).is_none());
        assert!(Payload::from_value(json!(null)).is_none());
    }

    #[rstest]
    #[case(json!({"id": 42}), "42")]
    #[case(json!({"id": "42"}), "42")]
    #[case(json!({"id": null}), "")]
    #[case(json!({}), "")]
    #[case(json!({"id": true}), "true")]
    #[case(json!({"id": [1, 2]}), "[1,2]")]
    fn text_degrades_to_empty(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(payload(value).text("id"), expected);
    }

    #[rstest]
    #[case(json!({"user_type_id": "2"}), 2)]
    #[case(json!({"user_type_id": 3}), 3)]
    #[case(json!({"user_type_id": " 2 "}), 2)]
    #[case(json!({"user_type_id": "abc"}), 1)]
    #[case(json!({"user_type_id": 2.5}), 1)]
    #[case(json!({"user_type_id": ""}), 1)]
    #[case(json!({}), 1)]
    fn parse_or_falls_back(#[case] value: Value, #[case] expected: i64) {
        assert_eq!(payload(value).parse_or("user_type_id", 1_i64), expected);
    }

    #[test]
    fn event_type_prefers_explicit_field() {
        let p = payload(json!({"event_type": "UserCreated", "event": "UserDeleted"}));
        assert_eq!(p.event_type(), Some("UserCreated"));
        let p = payload(json!({"event": "UserDeleted"}));
        assert_eq!(p.event_type(), Some("UserDeleted"));
        let p = payload(json!({"event": 7}));
        assert_eq!(p.event_type(), None);
    }
}
