use super::{NoticeSettings, UserFields};
use notis::{Payload, domain::EventHandler, errors::HandlerError};
use tracing::{Span, debug, debug_span};

/// 生成欢迎邮件
///
/// 模板占位符：`user_id`、`name`、`email`、`creation_date`、`custom_message`。
pub struct UserCreatedHandler {
    settings: NoticeSettings,
    span: Span,
}

impl UserCreatedHandler {
    pub const EVENT_TYPE: &'static str = "UserCreated";
    pub const TEMPLATE: &'static str = "welcome_client_template.html";
    pub const PREFIX: &'static str = "welcome";

    pub fn new(settings: NoticeSettings, parent: &Span) -> Self {
        Self {
            settings,
            span: debug_span!(parent: parent, "user_created"),
        }
    }
}

pub fn welcome_message(user_type: i64) -> &'static str {
    match user_type {
        1 => "Merci d'avoir visité notre magasin !",
        2 => "Salut et bienvenue dans l'équipe !",
        3 => "Bienvenue dans l'équipe de direction du magasin !",
        _ => "Merci d'être avec nous !",
    }
}

impl EventHandler for UserCreatedHandler {
    fn event_type(&self) -> &str {
        Self::EVENT_TYPE
    }

    fn handle(&self, payload: &Payload) -> Result<(), HandlerError> {
        let _entered = self.span.enter();
        let user = UserFields::from(payload);
        let template = self.settings.templates.load(Self::TEMPLATE)?;
        let html = template.render(&[
            ("user_id", user.id.as_str()),
            ("name", user.name.as_str()),
            ("email", user.email.as_str()),
            ("creation_date", user.datetime.as_str()),
            ("custom_message", welcome_message(user.user_type)),
        ]);
        let path = self.settings.write(Self::PREFIX, &user.id, &html)?;
        debug!(
            "生成欢迎邮件：{} (ID: {}; 类型: {})，{}",
            user.name,
            user.id,
            user.user_type,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Merci d'avoir visité notre magasin !")]
    #[case(2, "Salut et bienvenue dans l'équipe !")]
    #[case(3, "Bienvenue dans l'équipe de direction du magasin !")]
    #[case(0, "Merci d'être avec nous !")]
    #[case(4, "Merci d'être avec nous !")]
    #[case(-2, "Merci d'être avec nous !")]
    #[case(i64::MAX, "Merci d'être avec nous !")]
    fn message_by_user_type(#[case] user_type: i64, #[case] expected: &str) {
        assert_eq!(welcome_message(user_type), expected);
    }
}
