use crate::{error::EngineError, join};
use connectors::{
    catalog::{FieldTypes, SchemaCatalog, TableDescriptor},
    config::ServiceConfig,
    error::ExecutionError,
    executor::QueryExecutor,
    request::ListRecordsRequest,
    transport::{HttpTransport, Transport},
};
use model::{Row, query::Query};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Column labels and rows of one executed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub labels: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// For `SELECT *` the labels are every label seen across the rows, in
    /// first-seen order.
    fn new(query: &Query, rows: Vec<Row>) -> Self {
        let labels = if query.selects_all() {
            let mut labels: Vec<String> = Vec::new();
            for label in rows.iter().flat_map(|row| row.labels()) {
                if !labels.iter().any(|seen| seen == label) {
                    labels.push(label.to_string());
                }
            }
            labels
        } else {
            query.column_labels()
        };
        Self { labels, rows }
    }
}

/// Entry point for running SQL against one base container.
///
/// Owns the schema catalog, so every query run through the same engine
/// shares one field-type cache.
pub struct QueryEngine {
    catalog: Arc<SchemaCatalog>,
    executor: QueryExecutor,
}

impl QueryEngine {
    pub fn new(config: ServiceConfig) -> Result<Self, EngineError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        let catalog = Arc::new(SchemaCatalog::new(config.clone(), transport.clone()));
        let executor = QueryExecutor::new(config, transport, catalog.clone());
        Self { catalog, executor }
    }

    pub fn config(&self) -> &ServiceConfig {
        self.executor.config()
    }

    pub fn translate(&self, sql: &str) -> Result<Query, EngineError> {
        Ok(sql_syntax::translate(sql)?)
    }

    /// Fetches the base table rows of `query`, with the configured default
    /// view applied.
    pub async fn execute_base(&self, query: &Query) -> Result<Vec<Row>, ExecutionError> {
        let request = ListRecordsRequest::builder(query.table_name())
            .fields(query.required_base_fields())
            .filter_formula(query.filter_formula().map(str::to_string))
            .max_records(query.max_records())
            .sorts(query.sorts().to_vec())
            .view(self.config().default_view().map(str::to_string))
            .build();
        self.executor.execute(&request).await
    }

    /// Fetches the join table rows of `query`. Only the join's fields are
    /// requested; no filter, limit, sort or view applies to this side.
    pub async fn execute_join(&self, query: &Query) -> Result<Vec<Row>, ExecutionError> {
        let join = query
            .join()
            .ok_or_else(|| ExecutionError::MissingJoin(query.table_name().to_string()))?;

        let fields = query.required_join_fields();
        if fields.is_empty() {
            debug!(table = %join.table_name, "No join fields required, skipping fetch");
            return Ok(Vec::new());
        }

        let request = ListRecordsRequest::builder(join.table_name.as_str())
            .fields(fields)
            .build();
        self.executor.execute(&request).await
    }

    pub async fn field_types(&self, table: &str) -> Result<FieldTypes, ExecutionError> {
        self.catalog.field_types(table).await
    }

    pub async fn fetch_table_descriptors(&self) -> Result<Vec<TableDescriptor>, ExecutionError> {
        self.catalog.fetch_table_descriptors().await
    }

    pub fn merge(&self, query: &Query, base_rows: &[Row], join_rows: &[Row]) -> Vec<Row> {
        join::merge(query, base_rows, join_rows)
    }

    /// Lowers the record limit of `query` to `max_rows`. Zero leaves the
    /// query untouched.
    pub fn cap_max_records(&self, query: &Query, max_rows: u32) -> Query {
        query.with_max_records_cap(max_rows)
    }

    /// Translates and runs `sql`, fetching the base table and then the join
    /// table before merging.
    pub async fn run(&self, sql: &str, max_rows: u32) -> Result<QueryResult, EngineError> {
        let query = self.cap_max_records(&self.translate(sql)?, max_rows);

        let base_rows = self.execute_base(&query).await?;
        let join_rows = match query.join() {
            Some(_) => self.execute_join(&query).await?,
            None => Vec::new(),
        };

        let rows = self.merge(&query, &base_rows, &join_rows);
        info!(
            table = %query.table_name(),
            rows = rows.len(),
            "Query finished"
        );
        Ok(QueryResult::new(&query, rows))
    }
}
