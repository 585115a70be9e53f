use crate::error::CliError;
use connectors::config::{ServiceConfig, parse_timeout_seconds};
use std::{collections::HashMap, fs, path::Path};

pub const URL_VAR: &str = "TABSQL_URL";
pub const API_KEY_VAR: &str = "TABSQL_API_KEY";
pub const BASE_ID_VAR: &str = "TABSQL_BASE_ID";
pub const ENDPOINT_VAR: &str = "TABSQL_ENDPOINT";
pub const TIMEOUT_VAR: &str = "TABSQL_TIMEOUT_SECONDS";
pub const VIEW_VAR: &str = "TABSQL_VIEW";

const VAR_PREFIX: &str = "TABSQL_";

/// Environment variable manager that loads from the process and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file. File values override the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Builds the service configuration.
    ///
    /// An explicit connection URL wins, then `TABSQL_URL`, then the
    /// individual `TABSQL_*` variables.
    pub fn service_config(&self, url: Option<&str>) -> Result<ServiceConfig, CliError> {
        if let Some(url) = url.or_else(|| self.get(URL_VAR)) {
            return Ok(ServiceConfig::from_url(url)?);
        }

        let mut builder = ServiceConfig::builder();
        if let Some(api_key) = self.get(API_KEY_VAR) {
            builder = builder.api_key(api_key);
        }
        if let Some(base_id) = self.get(BASE_ID_VAR) {
            builder = builder.base_id(base_id);
        }
        if let Some(endpoint) = self.get(ENDPOINT_VAR) {
            builder = builder.endpoint(endpoint);
        }
        if let Some(timeout) = self.get(TIMEOUT_VAR) {
            builder = builder.timeout(parse_timeout_seconds(timeout)?);
        }
        if let Some(view) = self.get(VIEW_VAR) {
            builder = builder.default_view(view);
        }
        Ok(builder.build()?)
    }

    /// `TABSQL_*` variables in name order, with sensitive values masked.
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut described: Vec<(String, String)> = self
            .vars
            .iter()
            .filter(|(key, _)| key.starts_with(VAR_PREFIX))
            .map(|(key, value)| {
                let shown = if self.is_sensitive(key) {
                    "***".to_string()
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect();
        described.sort();
        described
    }

    fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        // Connection URLs may carry the API key as a parameter or user-info.
        key.ends_with("_url")
            || self
                .sensitive_patterns
                .iter()
                .any(|pattern| key.contains(pattern.as_str()))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim().trim_start_matches("export ").trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["secret", "token", "key", "auth", "password"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
