use crate::{
    catalog::SchemaCatalog, coercion::coerce_row, config::ServiceConfig, error::ExecutionError,
    request::ListRecordsRequest, transport::Transport,
};
use model::{Row, Value, core::identifiers::RECORD_ID_COLUMN};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Deserialize)]
struct RecordsPage {
    #[serde(default)]
    records: Vec<RecordPayload>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Deserialize)]
struct RecordPayload {
    #[serde(default)]
    id: String,
    #[serde(default)]
    fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RecordPayload {
    /// Record fields plus the synthetic identifier column.
    fn into_row(self) -> Row {
        let fields = self.fields.unwrap_or_default();
        let mut row = Row::with_capacity(fields.len() + 1);
        row.insert(RECORD_ID_COLUMN, Value::String(self.id));
        for (name, value) in fields {
            if name != RECORD_ID_COLUMN {
                row.insert(name, Value::from(value));
            }
        }
        row
    }
}

/// Runs list-records requests to completion, following continuation
/// tokens one page at a time.
pub struct QueryExecutor {
    config: Arc<ServiceConfig>,
    transport: Arc<dyn Transport>,
    catalog: Arc<SchemaCatalog>,
}

impl QueryExecutor {
    pub fn new(
        config: Arc<ServiceConfig>,
        transport: Arc<dyn Transport>,
        catalog: Arc<SchemaCatalog>,
    ) -> Self {
        Self {
            config,
            transport,
            catalog,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetches every page of `request` and coerces each row against the
    /// table's declared field types.
    ///
    /// The first failing page aborts the whole fetch; rows already read are
    /// dropped.
    pub async fn execute(&self, request: &ListRecordsRequest) -> Result<Vec<Row>, ExecutionError> {
        let field_types = self.catalog.field_types(&request.table).await?;

        let mut rows = Vec::new();
        let mut page = request.clone();
        let mut pages = 0usize;

        loop {
            let url = page.to_url(&self.config)?;
            debug!(url = %url, "Fetching records page");

            let body = self.transport.get(&url).await?.into_success_body()?;
            let parsed: RecordsPage = serde_json::from_str(&body)?;
            pages += 1;

            for record in parsed.records {
                let mut row = record.into_row();
                coerce_row(&mut row, &field_types);
                rows.push(row);
            }

            match parsed.offset.filter(|offset| !offset.is_empty()) {
                Some(offset) => {
                    debug!(offset = %offset, "Following continuation token");
                    page = request.with_offset(offset);
                }
                None => break,
            }
        }

        info!(
            table = %request.table,
            rows = rows.len(),
            pages,
            "Fetched records"
        );
        Ok(rows)
    }
}
