/// Upstream messaging API: credential issuance and template-message send.
pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{TemplateData, TemplateField, TemplateMessage, UpstreamResponse};
