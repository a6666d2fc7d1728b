//! # 处理器注册表

use crate::{Payload, domain::EventHandler, errors::HandlerError};
use ahash::AHashMap;
use tracing::{debug, warn};

/// 分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// 已由注册的处理器处理
    Handled,
    /// 该事件类型没有注册处理器
    NoHandler,
}

/// 事件类型到处理器的映射
///
/// 每个事件类型至多绑定一个处理器，重复注册时后注册者覆盖先注册者。
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: AHashMap<String, Box<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// 构造函数
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器，返回被覆盖的旧处理器
    pub fn register<H>(&mut self, handler: H) -> Option<Box<dyn EventHandler>>
    where
        H: EventHandler + 'static,
    {
        let event_type = handler.event_type().to_owned();
        let replaced = self.handlers.insert(event_type.clone(), Box::new(handler));
        match replaced {
            Some(_) => warn!("{event_type} 事件处理器被覆盖"),
            None => debug!("注册 {event_type} 事件处理器"),
        }
        replaced
    }

    /// 查找处理器
    pub fn resolve(&self, event_type: &str) -> Option<&dyn EventHandler> {
        self.handlers.get(event_type).map(|h| h.as_ref())
    }

    /// 分发事件，未注册的事件类型返回 [`Dispatch::NoHandler`]
    pub fn dispatch(&self, event_type: &str, payload: &Payload) -> Result<Dispatch, HandlerError> {
        match self.resolve(event_type) {
            Some(handler) => {
                handler.handle(payload)?;
                Ok(Dispatch::Handled)
            }
            None => Ok(Dispatch::NoHandler),
        }
    }

    /// 已注册的事件类型，按字典序
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// 已注册的处理器数
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 是否未注册任何处理器
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("event_types", &self.event_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingHandler;
    use serde_json::json;

    fn payload() -> Payload {
        Payload::from_value(json!({"id": 1})).unwrap()
    }

    #[test]
    fn dispatch_to_registered_handler() {
        let handler = RecordingHandler::new("UserCreated");
        let calls = handler.calls();
        let mut registry = HandlerRegistry::new();
        assert!(registry.register(handler).is_none());

        let result = registry.dispatch("UserCreated", &payload()).unwrap();

        assert_eq!(result, Dispatch::Handled);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn unregistered_type_has_no_side_effect() {
        let handler = RecordingHandler::new("UserCreated");
        let calls = handler.calls();
        let mut registry = HandlerRegistry::new();
        registry.register(handler);

        let result = registry.dispatch("OrderPlaced", &payload()).unwrap();

        assert_eq!(result, Dispatch::NoHandler);
        assert!(calls.lock().unwrap().is_empty());
        assert!(registry.resolve("OrderPlaced").is_none());
    }

    #[test]
    fn later_registration_overwrites() {
        let first = RecordingHandler::new("UserCreated");
        let second = RecordingHandler::new("UserCreated");
        let first_calls = first.calls();
        let second_calls = second.calls();
        let mut registry = HandlerRegistry::new();
        registry.register(first);

        let replaced = registry.register(second);
        registry.dispatch("UserCreated", &payload()).unwrap();

        assert_eq!(replaced.map(|h| h.event_type().to_owned()).as_deref(), Some("UserCreated"));
        assert_eq!(registry.len(), 1);
        assert!(first_calls.lock().unwrap().is_empty());
        assert_eq!(second_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn handler_error_propagates() {
        let mut registry = HandlerRegistry::new();
        registry.register(RecordingHandler::failing("UserDeleted"));

        let result = registry.dispatch("UserDeleted", &payload());

        assert!(matches!(result, Err(HandlerError::Template { .. })));
    }

    #[test]
    fn event_types_are_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register(RecordingHandler::new("UserDeleted"));
        registry.register(RecordingHandler::new("UserCreated"));
        assert_eq!(registry.event_types(), vec!["UserCreated", "UserDeleted"]);
        assert!(!registry.is_empty());
    }
}
