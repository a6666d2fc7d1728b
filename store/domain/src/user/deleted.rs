use super::{NoticeSettings, UserFields};
use notis::{Payload, domain::EventHandler, errors::HandlerError};
use tracing::{Span, debug, debug_span};

/// 生成告别邮件
///
/// 模板占位符：`user_id`、`name`、`email`、`deletion_date`、`custom_message`。
pub struct UserDeletedHandler {
    settings: NoticeSettings,
    span: Span,
}

impl UserDeletedHandler {
    pub const EVENT_TYPE: &'static str = "UserDeleted";
    pub const TEMPLATE: &'static str = "goodbye_client_template.html";
    pub const PREFIX: &'static str = "goodbye";

    pub fn new(settings: NoticeSettings, parent: &Span) -> Self {
        Self {
            settings,
            span: debug_span!(parent: parent, "user_deleted"),
        }
    }
}

pub fn goodbye_message(user_type: i64) -> &'static str {
    match user_type {
        1 => "Merci d'avoir magasiné chez nous. Nous espérons vous revoir bientôt.",
        2 => "Merci pour ton travail au sein de l'équipe. Bonne continuation !",
        3 => "Merci pour votre leadership au sein du magasin. Bonne continuation !",
        _ => "Merci pour votre temps avec nous.",
    }
}

impl EventHandler for UserDeletedHandler {
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
            ("deletion_date", user.datetime.as_str()),
            ("custom_message", goodbye_message(user.user_type)),
        ]);
        let path = self.settings.write(Self::PREFIX, &user.id, &html)?;
        debug!(?payload, "生成告别邮件：{} (ID: {})，{}", user.name, user.id, path.display());
        Ok(())
    }
}
