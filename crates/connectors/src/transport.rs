use crate::{config::ServiceConfig, error::ExecutionError};
use async_trait::async_trait;
use reqwest::{Url, header::ACCEPT};
use tracing::warn;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body of a 2xx response, or a status error carrying it.
    pub fn into_success_body(self) -> Result<String, ExecutionError> {
        if self.is_success() {
            return Ok(self.body);
        }
        warn!(
            status = self.status,
            body = %self.body,
            "API request failed"
        );
        Err(ExecutionError::Status {
            status: self.status,
            body: self.body,
        })
    }
}

/// Issues authenticated GET requests against the remote service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, ExecutionError>;
}

/// [`Transport`] over a pooled `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self, ExecutionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, ExecutionError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
