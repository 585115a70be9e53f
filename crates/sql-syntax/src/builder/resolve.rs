use crate::{
    ast::{ColumnItem, Columns, FieldRef, JoinSpec, SelectStatement, TableSpec},
    builder::{ParseResult, formula},
    error::ParseError,
};
use model::query::{Join, Origin, Query, SelectedField, Sort};

/// Tables a statement may qualify its columns with.
struct TableContext<'a> {
    base: &'a TableSpec,
    join: Option<&'a Join>,
}

impl TableContext<'_> {
    fn is_join(&self, qualifier: &str) -> bool {
        self.join.is_some_and(|join| join.matches_alias(qualifier))
    }

    fn selected_field(&self, item: &ColumnItem) -> ParseResult<SelectedField> {
        let reference = &item.field;
        let origin = match reference.qualifier.as_deref() {
            None => Origin::Base,
            Some(qualifier) if self.base.matches(qualifier) => Origin::Base,
            Some(qualifier) if self.is_join(qualifier) => Origin::Join,
            Some(_) => return Err(ParseError::UnknownTableReference(reference.text.clone())),
        };

        let label = match (item.alias.as_deref(), reference.qualifier.as_deref()) {
            (Some(alias), _) if !alias.is_empty() => alias.to_string(),
            (_, Some(qualifier)) => format!("{}.{}", qualifier, reference.field),
            _ => reference.field.clone(),
        };

        Ok(SelectedField::new(origin, reference.field.clone(), label))
    }

    /// Resolves a field that must belong to the base table.
    fn base_field<'f>(&self, reference: &'f FieldRef, clause: &'static str) -> ParseResult<&'f str> {
        match reference.qualifier.as_deref() {
            None => Ok(&reference.field),
            Some(qualifier) if self.base.matches(qualifier) => Ok(&reference.field),
            Some(qualifier) if self.is_join(qualifier) => Err(ParseError::NonBaseField {
                clause,
                field: reference.text.clone(),
            }),
            Some(_) => Err(ParseError::UnknownTableReference(reference.text.clone())),
        }
    }
}

/// Checks table qualifiers and assembles the query.
pub fn build_query(statement: SelectStatement) -> ParseResult<Query> {
    let join = statement
        .join
        .as_ref()
        .map(|spec| resolve_join(&statement.from, spec))
        .transpose()?;

    let context = TableContext {
        base: &statement.from,
        join: join.as_ref(),
    };

    let fields = match &statement.columns {
        Columns::All if join.is_some() => return Err(ParseError::SelectAllWithJoin),
        Columns::All => Vec::new(),
        Columns::List(items) => items
            .iter()
            .map(|item| context.selected_field(item))
            .collect::<ParseResult<Vec<_>>>()?,
    };

    let mut formulas = Vec::with_capacity(statement.predicates.len());
    for predicate in &statement.predicates {
        let field = context.base_field(&predicate.field, "WHERE")?;
        formulas.push(formula::equality(field, &predicate.value)?);
    }

    let sorts = statement
        .order_by
        .iter()
        .map(|item| {
            let field = context.base_field(&item.field, "ORDER BY")?;
            Ok(Sort::new(field, item.direction))
        })
        .collect::<ParseResult<Vec<_>>>()?;

    let query = Query::builder(statement.from.name.clone())
        .fields(fields)
        .filter_formula(formula::combine(formulas))
        .max_records(statement.limit)
        .sorts(sorts)
        .join(join)
        .build()?;
    Ok(query)
}

/// The left operand must name the base table and the right operand the
/// joined table.
fn resolve_join(base: &TableSpec, spec: &JoinSpec) -> ParseResult<Join> {
    if !spec
        .left
        .qualifier
        .as_deref()
        .is_some_and(|qualifier| base.matches(qualifier))
    {
        return Err(ParseError::JoinLeftNotBase(spec.left.text.clone()));
    }

    if !spec
        .right
        .qualifier
        .as_deref()
        .is_some_and(|qualifier| spec.table.matches(qualifier))
    {
        return Err(ParseError::JoinRightNotJoined {
            table: spec.table.name.clone(),
            found: spec.right.text.clone(),
        });
    }

    Ok(Join::new(
        spec.table.name.clone(),
        spec.table.alias.clone(),
        spec.left.field.clone(),
        spec.right.field.clone(),
    ))
}
