use reqwest::Client;
use tracing::debug;

use crate::config::settings::UpstreamConfig;
use crate::errors::RelayError;
use crate::upstream::types::{TemplateMessage, UpstreamResponse};

const TOKEN_PATH: &str = "/cgi-bin/token";
const TEMPLATE_SEND_PATH: &str = "/cgi-bin/message/template/send";

/// Thin wrapper over the two upstream endpoints. No timeouts or retries here.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    app_id: String,
    app_secret: String,
}

impl UpstreamClient {
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
        }
    }

    /// `GET /cgi-bin/token?grant_type=client_credential&appid=..&secret=..`
    pub async fn issue_credential(&self) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        debug!("requesting credential for appid {}", self.app_id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.app_id.as_str()),
                ("secret", self.app_secret.as_str()),
            ])
            .send()
            .await?;
        Ok(response.json::<UpstreamResponse>().await?)
    }

    /// `POST /cgi-bin/message/template/send?access_token=..`
    pub async fn send_template(
        &self,
        access_token: &str,
        message: &TemplateMessage,
    ) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}{}", self.base_url, TEMPLATE_SEND_PATH);
        let response = self
            .client
            .post(&url)
            .query(&[("access_token", access_token)])
            .json(message)
            .send()
            .await?;
        Ok(response.json::<UpstreamResponse>().await?)
    }
}
