//! Client-side LEFT JOIN of two fetched row sets.

use model::{
    Row, Value,
    core::identifiers::{RECORD_ID_COLUMN, is_record_id},
    query::{Origin, Query},
};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

mod keys;


pub use keys::{JoinKey, extract_keys};

/// Join rows grouped under every key their right-hand field carries.
struct JoinIndex<'a> {
    rows: &'a [Row],
    buckets: HashMap<JoinKey, Vec<usize>>,
}

impl<'a> JoinIndex<'a> {
    fn build(rows: &'a [Row], right_field: &str) -> Self {
        let mut buckets: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (position, row) in rows.iter().enumerate() {
            for key in extract_keys(&field_value(row, right_field)) {
                buckets.entry(key).or_default().push(position);
            }
        }
        Self { rows, buckets }
    }

    /// Join rows hit by any of `keys`, once each, in fetch order.
    fn lookup(&self, keys: &[JoinKey]) -> Vec<&'a Row> {
        let hits: BTreeSet<usize> = keys
            .iter()
            .filter_map(|key| self.buckets.get(key))
            .flatten()
            .copied()
            .collect();
        hits.into_iter().map(|position| &self.rows[position]).collect()
    }
}

/// One base row paired with the join row it matched, if any.
struct Candidate<'a> {
    base: &'a Row,
    joined: Option<&'a Row>,
}

impl Candidate<'_> {
    fn read(&self, origin: Origin, field: &str) -> Value {
        match origin {
            Origin::Base => field_value(self.base, field),
            Origin::Join => self
                .joined
                .map(|row| field_value(row, field))
                .unwrap_or(Value::Null),
        }
    }

    fn passes(&self, query: &Query) -> bool {
        query
            .post_filters()
            .iter()
            .all(|filter| filter.matches(&self.read(filter.origin, &filter.field)))
    }

    /// Output row in SELECT order. `SELECT *` yields the whole base row.
    fn project(&self, query: &Query) -> Row {
        if query.selects_all() {
            return self.base.clone();
        }
        query
            .selected_fields()
            .iter()
            .map(|selected| {
                (
                    selected.label.clone(),
                    self.read(selected.origin, &selected.field),
                )
            })
            .collect()
    }
}

/// Combines base and join rows into the final result set.
///
/// Without a join each base row is filtered and projected. With one, every
/// base row yields one candidate per matching join row, or a single
/// candidate with null JOIN columns when nothing matches. Base order is
/// preserved and matches follow the join rows' fetch order.
pub fn merge(query: &Query, base_rows: &[Row], join_rows: &[Row]) -> Vec<Row> {
    let Some(join) = query.join() else {
        return base_rows
            .iter()
            .map(|base| Candidate { base, joined: None })
            .filter(|candidate| candidate.passes(query))
            .map(|candidate| candidate.project(query))
            .collect();
    };

    let index = JoinIndex::build(join_rows, &join.right_field);
    let mut output = Vec::with_capacity(base_rows.len());

    for base in base_rows {
        let keys = extract_keys(&field_value(base, &join.left_field));
        let matches = index.lookup(&keys);

        let candidates: Vec<Candidate> = if matches.is_empty() {
            vec![Candidate { base, joined: None }]
        } else {
            matches
                .into_iter()
                .map(|joined| Candidate {
                    base,
                    joined: Some(joined),
                })
                .collect()
        };

        output.extend(
            candidates
                .iter()
                .filter(|candidate| candidate.passes(query))
                .map(|candidate| candidate.project(query)),
        );
    }

    debug!(
        base = base_rows.len(),
        joined = join_rows.len(),
        output = output.len(),
        "Merged join"
    );
    output
}

/// Reads `field` from a fetched row. Record-identifier aliases fall back to
/// the synthetic identifier column.
fn field_value(row: &Row, field: &str) -> Value {
    match row.get(field) {
        Some(value) => value.clone(),
        None if is_record_id(field) => row.get_or_null(RECORD_ID_COLUMN),
        None => Value::Null,
    }
}
