//! `slowlog report`: the grouped summary on stdout, as a table or JSON.

use anyhow::Result;
use serde::Serialize;
use slowlog_core::format::{summary_cells, SUMMARY_COLUMNS};
use slowlog_core::{sorted_indices, QueryGroup, SortColumn, SortDirection, SortSpec};

use crate::cli::output::print_table;
use crate::cli::source::{load_groups, LogSource};

/// Query text width in the printed table.
const REPORT_QUERY_WIDTH: usize = 60;
const NUMERIC_COLUMNS: [usize; 5] = [0, 4, 5, 6, 7];

/// Arguments for the report command
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Sort column: count, time, examined, sent, type, db, table
    #[arg(long, default_value = "count")]
    pub sort: SortColumn,

    /// Reverse the column's natural order
    #[arg(long)]
    pub asc: bool,

    /// Only print the first N groups
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn sort_spec(&self) -> SortSpec {
        let direction = if self.asc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        SortSpec::new(self.sort, direction)
    }
}

/// One group in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub query_type: String,
    pub database: String,
    pub table: String,
    pub count: usize,
    pub avg_query_time: f64,
    pub avg_rows_examined: f64,
    pub avg_rows_sent: f64,
    pub normalized_sql: String,
    pub example_sql: String,
}

/// Sort `groups` and keep the first `limit`.
pub fn report_rows(groups: &[QueryGroup], spec: SortSpec, limit: Option<usize>) -> Vec<ReportRow> {
    sorted_indices(groups, spec)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, group_idx)| {
            let group = &groups[group_idx];
            ReportRow {
                rank: idx + 1,
                query_type: group.query_type().to_string(),
                database: group.database().to_string(),
                table: group.table().to_string(),
                count: group.count(),
                avg_query_time: group.avg_query_time(),
                avg_rows_examined: group.avg_rows_examined(),
                avg_rows_sent: group.avg_rows_sent(),
                normalized_sql: group.normalized_sql().to_string(),
                example_sql: group
                    .first_example()
                    .map(|q| q.sql_text.clone())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Run the report command
pub fn run(args: ReportArgs, source: &LogSource) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let groups = rt.block_on(load_groups(source))?;

    let spec = args.sort_spec();
    if args.json {
        let rows = report_rows(&groups, spec, args.limit);
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No slow queries found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = sorted_indices(&groups, spec)
        .into_iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, group_idx)| summary_cells(idx + 1, &groups[group_idx], REPORT_QUERY_WIDTH).to_vec())
        .collect();
    let shown = rows.len();
    print_table(&SUMMARY_COLUMNS, rows, &NUMERIC_COLUMNS);
    println!(
        "{} of {} groups, sorted by {} ({})",
        shown,
        groups.len(),
        spec.column.label(),
        spec.direction.label().to_lowercase()
    );

    Ok(())
}
