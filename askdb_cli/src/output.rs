//! Output formatting for CLI commands.

use askdb_core::bridge::ProviderInfo;
use askdb_core::executor::StoreStatus;
use askdb_core::pipeline::StatsSnapshot;
use askdb_core::sql::types::Row;
use askdb_core::PipelineOutcome;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header<S: AsRef<str>>(table: &mut Table, headers: &[S]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h.as_ref()).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

fn print_key_value_table(items: &[(&str, String)]) {
    let mut table = create_table();
    add_header(&mut table, &["Property", "Value"]);
    for (key, value) in items {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    println!("{table}");
}

/// Cells for one result row, in header order.
fn row_cells(columns: &[String], row: &Row) -> Vec<String> {
    columns
        .iter()
        .map(|col| row.get(col).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

pub fn print_outcome(outcome: &PipelineOutcome, format: Format) -> anyhow::Result<()> {
    if let Format::Json = format {
        println!("{}", serde_json::to_string_pretty(&outcome.to_response())?);
        return Ok(());
    }

    if let Some(query) = outcome.query() {
        println!("Generated SQL: {}\n", query);
    }

    match outcome {
        PipelineOutcome::Success { result, .. } => {
            let mut table = create_table();
            add_header(&mut table, result.columns.as_slice());
            for row in &result.rows {
                table.add_row(row_cells(&result.columns, row).into_iter().map(Cell::new).collect::<Vec<_>>());
            }
            println!("{table}");
            println!("{} row(s)", result.row_count());
        }
        PipelineOutcome::Failure { reason, .. } => {
            error(reason.message());
        }
    }

    let timing: Vec<String> = outcome
        .telemetry()
        .iter()
        .map(|(phase, secs)| format!("{}={:.2}s", phase, secs))
        .collect();
    if !timing.is_empty() {
        println!("Timing: {}", timing.join(", "));
    }
    Ok(())
}

pub fn print_status(status: &StoreStatus, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(status)?),
        Format::Table => {
            let mut items = vec![
                ("Database", status.path.clone()),
                ("Connected", status.connected.to_string()),
                ("Tables", status.tables.join(", ")),
            ];
            if let Some(rows) = status.probe_rows {
                items.push(("Probe rows", rows.to_string()));
            }
            if let Some(err) = &status.error {
                items.push(("Error", err.clone()));
            }
            print_key_value_table(&items);
        }
    }
    Ok(())
}

pub fn print_providers(providers: &[ProviderInfo], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(providers)?),
        Format::Table => {
            let mut table = create_table();
            add_header(&mut table, &["Id", "Name", "Description", "Available"]);
            for provider in providers {
                let available = if provider.available {
                    Cell::new("yes").fg(Color::Green)
                } else {
                    Cell::new("no").fg(Color::Red)
                };
                table.add_row(vec![
                    Cell::new(provider.id),
                    Cell::new(provider.name),
                    Cell::new(provider.description),
                    available,
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

pub fn print_stats(stats: &StatsSnapshot, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(stats)?),
        Format::Table => print_key_value_table(&[
            ("Succeeded", stats.succeeded.to_string()),
            ("Failed", stats.failed.to_string()),
        ]),
    }
    Ok(())
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("✗ {msg}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::sql::types::Value;

    #[test]
    fn test_row_cells_follow_header_order() {
        let columns = vec!["name".to_string(), "name:1".to_string(), "yards".to_string()];
        let mut row = Row::new();
        row.insert("name:1".to_string(), Value::Text("Lions".to_string()));
        row.insert("name".to_string(), Value::Text("Jared Goff".to_string()));

        assert_eq!(row_cells(&columns, &row), vec!["Jared Goff", "Lions", ""]);
    }
}
