//! Counts command implementation

use anyhow::{Context, Result};
use pl_db::TableCounts;
use serde::Serialize;

use crate::cli::{CountsArgs, CountsOutput, GlobalArgs};
use crate::commands::common::{database_path, load_project, open_warehouse};

#[derive(Debug, Serialize)]
struct TableCount {
    table: &'static str,
    rows: i64,
}

#[derive(Debug, Serialize)]
struct CountsReport {
    database: String,
    tables: Vec<TableCount>,
}

impl CountsReport {
    fn new(database: String, counts: &TableCounts) -> Self {
        let tables = counts
            .entries()
            .into_iter()
            .map(|(table, rows)| TableCount { table, rows })
            .collect();
        Self { database, tables }
    }
}

/// Execute the counts command
pub(crate) fn execute(args: &CountsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let warehouse = open_warehouse(&project, global)?;
    let counts = warehouse
        .table_counts()
        .context("Failed to count warehouse rows")?;
    let report = CountsReport::new(database_path(&project, global), &counts);

    match args.output {
        CountsOutput::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize counts")?;
            println!("{json}");
        }
        CountsOutput::Text => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &CountsReport) {
    let width = report
        .tables
        .iter()
        .map(|t| t.table.len())
        .max()
        .unwrap_or(0);

    println!("Warehouse: {}", report.database);
    for entry in &report.tables {
        println!("  {:<width$}  {:>8}", entry.table, entry.rows);
    }
}
