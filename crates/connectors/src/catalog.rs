use crate::{
    config::ServiceConfig, error::ExecutionError, request::metadata_url, transport::Transport,
};
use model::core::identifiers::normalize_key;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Lower-cased field name to lower-cased declared type.
pub type FieldTypes = Arc<HashMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Deserialize)]
struct TablesResponse {
    #[serde(default)]
    tables: Vec<TableDescriptor>,
}

/// Per-client cache of declared field types, filled lazily per table.
///
/// Entries are never invalidated. Fills are serialized so each table's
/// metadata is fetched at most once, even under concurrent callers.
pub struct SchemaCatalog {
    config: Arc<ServiceConfig>,
    transport: Arc<dyn Transport>,
    cache: Mutex<HashMap<String, FieldTypes>>,
}

impl SchemaCatalog {
    pub fn new(config: Arc<ServiceConfig>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch_table_descriptors(&self) -> Result<Vec<TableDescriptor>, ExecutionError> {
        let url = metadata_url(&self.config)?;
        debug!(url = %url, "Fetching table descriptors");

        let body = self.transport.get(&url).await?.into_success_body()?;
        let response: TablesResponse = serde_json::from_str(&body)?;
        Ok(response.tables)
    }

    /// Declared types for `table`. A table missing from the metadata
    /// listing yields (and caches) an empty mapping.
    pub async fn field_types(&self, table: &str) -> Result<FieldTypes, ExecutionError> {
        let key = normalize_key(table);
        let mut cache = self.cache.lock().await;
        if let Some(types) = cache.get(&key) {
            return Ok(Arc::clone(types));
        }

        let tables = self.fetch_table_descriptors().await?;
        let types: HashMap<String, String> =
            match tables.iter().find(|descriptor| normalize_key(&descriptor.name) == key) {
                Some(descriptor) => descriptor
                    .fields
                    .iter()
                    .map(|field| (normalize_key(&field.name), field.field_type.to_lowercase()))
                    .collect(),
                None => {
                    warn!(table, "Table not found in metadata listing");
                    HashMap::new()
                }
            };

        info!(table, fields = types.len(), "Cached field types");
        let types = Arc::new(types);
        cache.insert(key, Arc::clone(&types));
        Ok(types)
    }
}
