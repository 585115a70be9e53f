use crate::{core::identifiers::is_record_id, error::ModelError};
use serde::Serialize;

pub mod filter;
pub mod join;
pub mod select;
pub mod sort;

pub use filter::{PostFilter, PostFilterOp};
pub use join::Join;
pub use select::{Origin, SelectedField};
pub use sort::{Sort, SortDirection};

/// A translated SELECT statement.
///
/// Read-only once built. The only derivation offered is
/// [`Query::with_max_records_cap`], which can lower (never raise) the
/// record limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    table_name: String,
    /// Empty means "every remote field".
    selected_fields: Vec<SelectedField>,
    filter_formula: Option<String>,
    max_records: Option<u32>,
    sorts: Vec<Sort>,
    join: Option<Join>,
    post_filters: Vec<PostFilter>,
}

impl Query {
    pub fn builder(table_name: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn selected_fields(&self) -> &[SelectedField] {
        &self.selected_fields
    }

    pub fn filter_formula(&self) -> Option<&str> {
        self.filter_formula.as_deref()
    }

    pub fn max_records(&self) -> Option<u32> {
        self.max_records
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn join(&self) -> Option<&Join> {
        self.join.as_ref()
    }

    pub fn post_filters(&self) -> &[PostFilter] {
        &self.post_filters
    }

    /// True for `SELECT *`.
    pub fn selects_all(&self) -> bool {
        self.selected_fields.is_empty()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.selected_fields
            .iter()
            .map(|field| field.label.clone())
            .collect()
    }

    /// Fields to request from the base table: BASE columns plus the join's
    /// left key. Record identifiers are never requested.
    pub fn required_base_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        for selected in &self.selected_fields {
            if selected.origin == Origin::Base {
                push_unique(&mut fields, &selected.field);
            }
        }
        if let Some(join) = &self.join {
            push_unique(&mut fields, &join.left_field);
        }
        fields
    }

    /// Fields to request from the join table: JOIN columns plus the join's
    /// right key. Empty when the query has no join.
    pub fn required_join_fields(&self) -> Vec<String> {
        let Some(join) = &self.join else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        for selected in &self.selected_fields {
            if selected.origin == Origin::Join {
                push_unique(&mut fields, &selected.field);
            }
        }
        push_unique(&mut fields, &join.right_field);
        fields
    }

    /// Returns a copy whose `max_records` is the smaller of the current
    /// value and `cap`. A `cap` of zero means "no external cap".
    pub fn with_max_records_cap(&self, cap: u32) -> Query {
        let mut capped = self.clone();
        if cap == 0 {
            return capped;
        }
        capped.max_records = Some(match self.max_records {
            Some(current) => current.min(cap),
            None => cap,
        });
        capped
    }
}

fn push_unique(fields: &mut Vec<String>, field: &str) {
    if is_record_id(field) || fields.iter().any(|existing| existing == field) {
        return;
    }
    fields.push(field.to_string());
}

pub struct QueryBuilder {
    table_name: String,
    selected_fields: Vec<SelectedField>,
    filter_formula: Option<String>,
    max_records: Option<u32>,
    sorts: Vec<Sort>,
    join: Option<Join>,
    post_filters: Vec<PostFilter>,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Self {
        QueryBuilder {
            table_name: table_name.into(),
            selected_fields: Vec::new(),
            filter_formula: None,
            max_records: None,
            sorts: Vec::new(),
            join: None,
            post_filters: Vec::new(),
        }
    }

    pub fn field(mut self, field: SelectedField) -> Self {
        self.selected_fields.push(field);
        self
    }

    pub fn fields(mut self, fields: Vec<SelectedField>) -> Self {
        self.selected_fields = fields;
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

    pub fn join(mut self, join: Option<Join>) -> Self {
        self.join = join;
        self
    }

    pub fn post_filter(mut self, filter: PostFilter) -> Self {
        self.post_filters.push(filter);
        self
    }

    pub fn post_filters(mut self, filters: Vec<PostFilter>) -> Self {
        self.post_filters = filters;
        self
    }

    pub fn build(self) -> Result<Query, ModelError> {
        if self.table_name.trim().is_empty() {
            return Err(ModelError::EmptyTableName);
        }
        if self.max_records == Some(0) {
            return Err(ModelError::NonPositiveMaxRecords(0));
        }

        for field in &self.selected_fields {
            if field.field.is_empty() {
                return Err(ModelError::EmptyFieldName);
            }
            if field.origin == Origin::Join && self.join.is_none() {
                return Err(ModelError::JoinFieldWithoutJoin(field.label.clone()));
            }
        }
        for filter in &self.post_filters {
            if filter.origin == Origin::Join && self.join.is_none() {
                return Err(ModelError::JoinFieldWithoutJoin(filter.field.clone()));
            }
        }

        Ok(Query {
            table_name: self.table_name,
            selected_fields: self.selected_fields,
            filter_formula: self.filter_formula,
            max_records: self.max_records,
            sorts: self.sorts,
            join: self.join,
            post_filters: self.post_filters,
        })
    }
}
