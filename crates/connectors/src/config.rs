use crate::error::ConfigError;
use reqwest::Url;
use std::{fmt, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const URL_SCHEME: &str = "tabsql";

/// Connection settings for one base container of the remote service.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    api_key: String,
    base_id: String,
    endpoint: String,
    timeout: Duration,
    default_view: Option<String>,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Parses `tabsql://<baseId>?apiKey=...&apiBaseUrl=...&timeoutSeconds=...&view=...`.
    ///
    /// The base id may also be given as the URL path or a `baseId`
    /// parameter, and the API key as the URL user-info.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim();
        let candidate = if trimmed.contains("://") || trimmed.starts_with(&format!("{}:", URL_SCHEME)) {
            trimmed.to_string()
        } else {
            format!("{}://{}", URL_SCHEME, trimmed.trim_start_matches('/'))
        };
        let parsed = Url::parse(&candidate).map_err(|e| ConfigError::MalformedUrl(e.to_string()))?;

        let param = |name: &str| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = ServiceConfig::builder();

        if let Some(api_key) = param("apiKey").or_else(|| non_empty(parsed.username())) {
            builder = builder.api_key(api_key);
        }

        let base_id = parsed
            .host_str()
            .and_then(non_empty)
            .or_else(|| non_empty(parsed.path().trim_start_matches('/')))
            .or_else(|| param("baseId"));
        if let Some(base_id) = base_id {
            builder = builder.base_id(base_id);
        }

        if let Some(endpoint) = param("apiBaseUrl") {
            builder = builder.endpoint(endpoint);
        }
        if let Some(timeout) = param("timeoutSeconds") {
            builder = builder.timeout(parse_timeout_seconds(&timeout)?);
        }
        if let Some(view) = param("view") {
            builder = builder.default_view(view);
        }

        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// API root without a trailing `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_view(&self) -> Option<&str> {
        self.default_view.as_deref()
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("default_view", &self.default_view)
            .finish()
    }
}

#[derive(Default)]
pub struct ServiceConfigBuilder {
    api_key: Option<String>,
    base_id: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    default_view: Option<String>,
}

impl ServiceConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn default_view(mut self, view: impl Into<String>) -> Self {
        self.default_view = Some(view.into());
        self
    }

    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .and_then(non_empty)
            .ok_or(ConfigError::MissingApiKey)?;
        let base_id = self
            .base_id
            .as_deref()
            .and_then(non_empty)
            .ok_or(ConfigError::MissingBaseId)?;

        let endpoint = self
            .endpoint
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint).map_err(|_| ConfigError::InvalidEndpoint(endpoint.clone()))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        Ok(ServiceConfig {
            api_key,
            base_id,
            endpoint,
            timeout,
            default_view: self.default_view.as_deref().and_then(non_empty),
        })
    }
}

/// Parses a positive number of seconds.
pub fn parse_timeout_seconds(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
