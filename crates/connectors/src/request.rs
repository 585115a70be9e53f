use crate::{config::ServiceConfig, error::ExecutionError};
use model::query::Sort;
use reqwest::Url;

/// One page request against the list-records endpoint of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRecordsRequest {
    pub table: String,
    /// Empty means every field.
    pub fields: Vec<String>,
    pub filter_formula: Option<String>,
    pub max_records: Option<u32>,
    pub sorts: Vec<Sort>,
    pub view: Option<String>,
    /// Continuation token from the previous page.
    pub offset: Option<String>,
}

impl ListRecordsRequest {
    pub fn builder(table: impl Into<String>) -> ListRecordsRequestBuilder {
        ListRecordsRequestBuilder::new(table)
    }

    /// Same request, positioned at the page `offset` points to.
    pub fn with_offset(&self, offset: impl Into<String>) -> Self {
        Self {
            offset: Some(offset.into()),
            ..self.clone()
        }
    }

    /// Query parameters in the order they are sent.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for field in &self.fields {
            pairs.push(("fields[]".to_string(), field.clone()));
        }
        if let Some(formula) = &self.filter_formula {
            pairs.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(max_records) = self.max_records {
            pairs.push(("maxRecords".to_string(), max_records.to_string()));
        }
        if let Some(view) = &self.view {
            pairs.push(("view".to_string(), view.clone()));
        }
        for (index, sort) in self.sorts.iter().enumerate() {
            pairs.push((format!("sort[{}][field]", index), sort.field.clone()));
            pairs.push((
                format!("sort[{}][direction]", index),
                sort.direction.as_param().to_string(),
            ));
        }
        if let Some(offset) = &self.offset {
            pairs.push(("offset".to_string(), offset.clone()));
        }

        pairs
    }

    /// `{endpoint}/{baseId}/{table}?...` with the table name escaped as a
    /// single path segment.
    pub fn to_url(&self, config: &ServiceConfig) -> Result<Url, ExecutionError> {
        let mut url = service_url(config, &[config.base_id(), self.table.as_str()])?;

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

pub struct ListRecordsRequestBuilder {
    table: String,
    fields: Vec<String>,
    filter_formula: Option<String>,
    max_records: Option<u32>,
    sorts: Vec<Sort>,
    view: Option<String>,
}

impl ListRecordsRequestBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        ListRecordsRequestBuilder {
            table: table.into(),
            fields: Vec::new(),
            filter_formula: None,
            max_records: None,
            sorts: Vec::new(),
            view: None,
        }
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn filter_formula(mut self, formula: Option<String>) -> Self {
        self.filter_formula = formula;
        self
    }

    pub fn max_records(mut self, max_records: Option<u32>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn sorts(mut self, sorts: Vec<Sort>) -> Self {
        self.sorts = sorts;
        self
    }

    pub fn view(mut self, view: Option<String>) -> Self {
        self.view = view;
        self
    }

    pub fn build(self) -> ListRecordsRequest {
        ListRecordsRequest {
            table: self.table,
            fields: self.fields,
            filter_formula: self.filter_formula,
            max_records: self.max_records,
            sorts: self.sorts,
            view: self.view,
            offset: None,
        }
    }
}

/// `{endpoint}/meta/bases/{baseId}/tables`
pub fn metadata_url(config: &ServiceConfig) -> Result<Url, ExecutionError> {
    service_url(config, &["meta", "bases", config.base_id(), "tables"])
}

fn service_url(config: &ServiceConfig, segments: &[&str]) -> Result<Url, ExecutionError> {
    let mut url = Url::parse(config.endpoint())
        .map_err(|e| ExecutionError::InvalidUrl(format!("{}: {}", config.endpoint(), e)))?;
    url.path_segments_mut()
        .map_err(|_| ExecutionError::InvalidUrl(config.endpoint().to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
