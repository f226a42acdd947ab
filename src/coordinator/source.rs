//! Sources of embed credentials.

use super::error::CoordinatorError;
use crate::core::EmbedCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint serving the sample report's embed configuration.
pub const SAMPLE_REPORT_URL: &str = "https://playgroundbe-bck-1.azurewebsites.net/Reports/SampleReport";

/// Anything that can produce embed credentials.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch(&self) -> Result<EmbedCredentials, CoordinatorError>;
}

#[derive(Debug, Deserialize)]
struct EmbedTokenBody {
    #[serde(rename = "Token")]
    token: String,
}

/// Body returned by the embed-config endpoint.
#[derive(Debug, Deserialize)]
struct EmbedConfigBody {
    #[serde(rename = "EmbedUrl")]
    embed_url: String,
    #[serde(rename = "EmbedToken")]
    embed_token: EmbedTokenBody,
    #[serde(rename = "ReportId", default)]
    report_id: Option<String>,
}

impl From<EmbedConfigBody> for EmbedCredentials {
    fn from(body: EmbedConfigBody) -> Self {
        Self {
            embed_url: body.embed_url,
            token: body.embed_token.token,
            report_id: body.report_id,
        }
    }
}

/// Parse an embed-config response body.
///
/// # Example
///
/// ```rust
/// use report_widget::coordinator::parse_embed_config;
///
/// let creds = parse_embed_config(r#"{"EmbedUrl":"https://embed","EmbedToken":{"Token":"t"}}"#).unwrap();
/// assert_eq!(creds.embed_url, "https://embed");
/// assert_eq!(creds.token, "t");
/// assert!(creds.report_id.is_none());
/// ```
pub fn parse_embed_config(body: &str) -> Result<EmbedCredentials, CoordinatorError> {
    serde_json::from_str::<EmbedConfigBody>(body)
        .map(EmbedCredentials::from)
        .map_err(|e| CoordinatorError::Decode(e.to_string()))
}

/// Fetches credentials with a plain `GET` to a fixed URL.
#[derive(Clone, Debug)]
pub struct HttpConfigSource {
    client: Client,
    endpoint: String,
}

impl HttpConfigSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Build with a request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch(&self) -> Result<EmbedCredentials, CoordinatorError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoordinatorError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        parse_embed_config(&body)
    }
}
