//! Engine tests
//!
//! Every test runs against [`MockTransport`], which serves canned pages per
//! table and records the URLs it was asked for.

mod cache;
mod run;

use async_trait::async_trait;
use connectors::{
    config::ServiceConfig,
    error::ExecutionError,
    transport::{HttpResponse, Transport},
};
use engine_core::QueryEngine;
use reqwest::Url;
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

const METADATA_KEY: &str = "__meta__";

/// Canned responses keyed by table name and continuation token.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<(String, Option<String>), HttpResponse>,
    delay: Option<Duration>,
    seen: Mutex<Vec<Url>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn metadata(mut self, tables: serde_json::Value) -> Self {
        self.responses.insert(
            (METADATA_KEY.to_string(), None),
            HttpResponse::new(200, json!({ "tables": tables }).to_string()),
        );
        self
    }

    /// Serves `records` as the only page of `table`.
    pub fn records(self, table: &str, records: serde_json::Value) -> Self {
        self.page(table, None, records, None)
    }

    pub fn page(
        mut self,
        table: &str,
        offset: Option<&str>,
        records: serde_json::Value,
        next: Option<&str>,
    ) -> Self {
        let body = match next {
            Some(next) => json!({ "records": records, "offset": next }),
            None => json!({ "records": records }),
        };
        self.responses.insert(
            (table.to_string(), offset.map(str::to_string)),
            HttpResponse::new(200, body.to_string()),
        );
        self
    }

    pub fn failure(mut self, table: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert((table.to_string(), None), HttpResponse::new(status, body));
        self
    }

    pub fn seen(&self) -> Vec<Url> {
        self.seen.lock().unwrap().clone()
    }

    /// Record-listing requests made against `table`.
    pub fn table_requests(&self, table: &str) -> Vec<Url> {
        self.seen()
            .into_iter()
            .filter(|url| route_key(url).0 == table)
            .collect()
    }

    pub fn metadata_requests(&self) -> usize {
        self.table_requests(METADATA_KEY).len()
    }
}

fn route_key(url: &Url) -> (String, Option<String>) {
    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| segments.map(str::to_string).collect())
        .unwrap_or_default();

    if segments.iter().any(|segment| segment == "meta") {
        return (METADATA_KEY.to_string(), None);
    }
    let table = segments.last().cloned().unwrap_or_default();
    (table, param(url, "offset"))
}

pub fn param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

pub fn params(url: &Url, key: &str) -> Vec<String> {
    url.query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, ExecutionError> {
        self.seen.lock().unwrap().push(url.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .responses
            .get(&route_key(url))
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, r#"{"error":"NOT_FOUND"}"#)))
    }
}

pub fn crm_metadata() -> serde_json::Value {
    json!([
        {
            "id": "tblContacts",
            "name": "Contacts",
            "fields": [
                {"id": "fld1", "name": "Name", "type": "singleLineText"},
                {"id": "fld2", "name": "OrgId", "type": "multipleRecordLinks"},
                {"id": "fld3", "name": "Since", "type": "date"}
            ]
        },
        {
            "id": "tblOrgs",
            "name": "Organizations",
            "fields": [
                {"id": "fld4", "name": "Industry", "type": "singleSelect"},
                {"id": "fld5", "name": "Owners", "type": "multipleCollaborators"}
            ]
        }
    ])
}

pub fn engine(transport: Arc<MockTransport>, view: Option<&str>) -> QueryEngine {
    let mut builder = ServiceConfig::builder()
        .api_key("key")
        .base_id("appCrm")
        .endpoint("https://api.test/v0");
    if let Some(view) = view {
        builder = builder.default_view(view);
    }
    QueryEngine::with_transport(builder.build().unwrap(), transport)
}
