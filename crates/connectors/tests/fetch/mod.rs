//! Fetch layer tests
//!
//! These tests drive the schema catalog and the query executor through a
//! scripted in-memory transport. No network access is involved.


use async_trait::async_trait;
use connectors::{
    catalog::SchemaCatalog,
    config::ServiceConfig,
    error::ExecutionError,
    executor::QueryExecutor,
    transport::{HttpResponse, Transport},
};
use reqwest::Url;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

pub const BASE_ID: &str = "appTest";

pub fn test_config() -> Arc<ServiceConfig> {
    Arc::new(
        ServiceConfig::builder()
            .api_key("test-key")
            .base_id(BASE_ID)
            .endpoint("https://api.test/v0")
            .build()
            .unwrap(),
    )
}

struct Route {
    path: String,
    offset: Option<String>,
    response: HttpResponse,
}

/// Answers requests from a fixed set of routes and records every URL asked
/// for. Unknown routes get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    delay: Option<Duration>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_metadata(self, body: serde_json::Value) -> Self {
        let path = format!("/v0/meta/bases/{}/tables", BASE_ID);
        self.with_route(path, None, HttpResponse::new(200, body.to_string()))
    }

    pub fn with_page(self, table: &str, offset: Option<&str>, body: serde_json::Value) -> Self {
        self.with_route(
            table_path(table),
            offset,
            HttpResponse::new(200, body.to_string()),
        )
    }

    pub fn with_response(self, table: &str, offset: Option<&str>, response: HttpResponse) -> Self {
        self.with_route(table_path(table), offset, response)
    }

    fn with_route(mut self, path: String, offset: Option<&str>, response: HttpResponse) -> Self {
        self.routes.push(Route {
            path,
            offset: offset.map(str::to_string),
            response,
        });
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, path_suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.path().ends_with(path_suffix))
            .count()
    }
}

fn table_path(table: &str) -> String {
    let mut url = Url::parse("https://api.test/v0").unwrap();
    url.path_segments_mut().unwrap().push(BASE_ID).push(table);
    url.path().to_string()
}

pub fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, ExecutionError> {
        self.requests.lock().unwrap().push(url.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let offset = query_value(url, "offset");
        let response = self
            .routes
            .iter()
            .find(|route| route.path == url.path() && route.offset == offset)
            .map(|route| route.response.clone())
            .unwrap_or_else(|| HttpResponse::new(404, r#"{"error":"NOT_FOUND"}"#));
        Ok(response)
    }
}

pub fn executor(transport: Arc<ScriptedTransport>) -> (QueryExecutor, Arc<SchemaCatalog>) {
    let config = test_config();
    let catalog = Arc::new(SchemaCatalog::new(config.clone(), transport.clone()));
    let executor = QueryExecutor::new(config, transport, catalog.clone());
    (executor, catalog)
}
