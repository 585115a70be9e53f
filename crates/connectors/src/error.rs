use thiserror::Error;

/// Failure of a fetch against the remote service.
///
/// Always terminal for the fetch that raised it; rows from earlier pages
/// are discarded.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// I/O failure, timeout or TLS error while talking to the service.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Airtable API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON shape expected.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// A join-table fetch was requested for a query without a join.
    #[error("Query on table '{0}' has no join")]
    MissingJoin(String),
}

/// Invalid or incomplete service configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("apiKey parameter is required to authenticate with the service.")]
    MissingApiKey,

    #[error("Base ID is required. Provide it in the connection URL (tabsql://<baseId>) or via the 'baseId' parameter.")]
    MissingBaseId,

    #[error("Invalid timeoutSeconds parameter: {0}")]
    InvalidTimeout(String),

    #[error("Malformed connection URL: {0}")]
    MalformedUrl(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
