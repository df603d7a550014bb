use crate::config::settings::MessageConfig;
use crate::upstream::{TemplateData, TemplateField, TemplateMessage};
use crate::utils::constants::{
    COLOR_DESC, COLOR_FROM, COLOR_REMARK, FALLBACK_DESC, FALLBACK_FROM, FALLBACK_REMARK,
    FALLBACK_URL,
};

/// Request-scoped notification. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPayload {
    pub openid: String,
    pub from: Option<String>,
    pub desc: Option<String>,
    pub remark: Option<String>,
    pub url: Option<String>,
}

/// First non-empty of: request value, configured default, hardcoded fallback.
pub fn resolve_field(explicit: Option<&str>, configured: Option<&str>, fallback: &str) -> String {
    explicit
        .filter(|v| !v.is_empty())
        .or(configured.filter(|v| !v.is_empty()))
        .unwrap_or(fallback)
        .to_owned()
}

impl NotificationPayload {
    pub fn to_template_message(&self, template_id: &str, message: &MessageConfig) -> TemplateMessage {
        let defaults = &message.defaults;
        let colors = &message.colors;

        let from = resolve_field(self.from.as_deref(), defaults.from.as_deref(), FALLBACK_FROM);
        let desc = resolve_field(self.desc.as_deref(), defaults.desc.as_deref(), FALLBACK_DESC);
        let remark = resolve_field(self.remark.as_deref(), defaults.remark.as_deref(), FALLBACK_REMARK);
        let url = resolve_field(self.url.as_deref(), defaults.url.as_deref(), FALLBACK_URL);

        TemplateMessage {
            touser: self.openid.clone(),
            template_id: template_id.to_owned(),
            url,
            data: TemplateData {
                from: TemplateField::new(from, resolve_field(None, colors.from.as_deref(), COLOR_FROM)),
                desc: TemplateField::new(desc, resolve_field(None, colors.desc.as_deref(), COLOR_DESC)),
                remark: TemplateField::new(
                    remark,
                    resolve_field(None, colors.remark.as_deref(), COLOR_REMARK),
                ),
            },
        }
    }
}
