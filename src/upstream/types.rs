use serde::{Deserialize, Serialize};

/// Response shape shared by the issuance and send endpoints.
/// Issuance success carries `access_token` and no `errcode`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpstreamResponse {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msgid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.errcode == 0
    }
}

/// ================================
/// Template message
/// ================================
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateMessage {
    pub touser: String,
    pub template_id: String,
    pub url: String,
    pub data: TemplateData,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateData {
    #[serde(rename = "FROM")]
    pub from: TemplateField,
    #[serde(rename = "DESC")]
    pub desc: TemplateField,
    #[serde(rename = "REMARK")]
    pub remark: TemplateField,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateField {
    pub value: String,
    pub color: String,
}

impl TemplateField {
    pub fn new(value: String, color: String) -> Self {
        Self { value, color }
    }
}
