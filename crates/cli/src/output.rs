use crate::error::CliError;
use clap::ValueEnum;
use connectors::catalog::TableDescriptor;
use engine_core::QueryResult;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_result(result: &QueryResult, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => print_json(&result.rows),
        OutputFormat::Table => {
            print!("{}", result_table(result));
            println!("({} rows)", result.rows.len());
            Ok(())
        }
    }
}

pub fn print_tables(tables: &[TableDescriptor]) {
    let rows = tables
        .iter()
        .map(|table| {
            vec![
                table.id.clone(),
                table.name.clone(),
                table.fields.len().to_string(),
            ]
        })
        .collect();
    print!("{}", render_table(&["ID", "Name", "Fields"], rows));
}

pub fn print_field_types(types: &HashMap<String, String>) {
    let mut rows: Vec<Vec<String>> = types
        .iter()
        .map(|(field, field_type)| vec![field.clone(), field_type.clone()])
        .collect();
    rows.sort();
    print!("{}", render_table(&["Field", "Type"], rows));
}

fn result_table(result: &QueryResult) -> String {
    let headers: Vec<&str> = result.labels.iter().map(String::as_str).collect();
    let rows = result
        .rows
        .iter()
        .map(|row| {
            result
                .labels
                .iter()
                .map(|label| row.get_or_null(label).to_string())
                .collect()
        })
        .collect();
    render_table(&headers, rows)
}

/// Left-aligned columns padded to the widest cell, with a dashed rule under
/// the header.
fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&format!("{}\n", rule.join("-+-")));
    for row in &rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
