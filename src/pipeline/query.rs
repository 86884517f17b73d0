use crate::batch::make_batches;
use crate::config::{ColumnNaming, QueryConfig};
use crate::io::alignment::extract_identifiers;
use crate::io::export::export_table_csv;
use crate::mart::{merge_tables, AnnotationService, ResultTable};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// What a `query` run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub files: usize,
    pub identifiers: usize,
    pub batches: usize,
    pub rows_returned: usize,
    pub rows_written: usize,
    pub output: PathBuf,
}

/// Run the whole pipeline: scan, batch, query, merge, write
///
/// Batches are submitted one at a time. The output file is only written
/// after every batch has succeeded.
pub fn run_query<S: AnnotationService>(config: &QueryConfig, service: &S) -> Result<RunSummary> {
    config.validate()?;
    let start = Instant::now();

    let scan = extract_identifiers(&config.root_dir, config.id_source)?;
    let identifiers = scan.ids.len();
    if identifiers == 0 {
        warn!("No identifiers found in {} files", scan.files.len());
    }

    let batches = make_batches(scan.ids, config.batch_size);
    info!(
        "Querying {} ids against {} in {} batches of up to {}",
        identifiers,
        config.target.dataset,
        batches.len(),
        config.batch_size
    );

    let mut tables: Vec<ResultTable> = Vec::with_capacity(batches.len());
    for batch in &batches {
        info!(
            "Querying batch {} of {} ({} IDs)...",
            batch.index,
            batches.len(),
            batch.len()
        );
        let table = service.query_batch(&config.filter, batch, &config.attributes, config.column_naming)?;
        info!("Returned columns: {:?} | Rows: {}", table.columns, table.len());
        tables.push(table);
    }

    let columns = match config.column_naming {
        ColumnNaming::Attribute => config.attributes.clone(),
        // first batch that returned rows fixes the header; empty batches adopt it
        ColumnNaming::Display => tables
            .iter()
            .find(|t| !t.is_empty())
            .map(|t| t.columns.clone())
            .unwrap_or_else(|| config.attributes.clone()),
    };
    let mut merged = merge_tables(columns, tables)?;
    let rows_returned = merged.len();
    info!("Total rows: {}", rows_returned);

    if !config.keep_incomplete {
        let dropped = merged.drop_incomplete();
        info!(
            "{} entries before drop, {} after dropping incomplete rows",
            rows_returned,
            merged.len()
        );
        if dropped > 0 {
            warn!("Dropped {} rows with empty values", dropped);
        }
    }

    export_table_csv(&merged, &config.output)?;
    info!(
        "Wrote {} rows to {} in {:.2}s",
        merged.len(),
        config.output.display(),
        start.elapsed().as_secs_f32()
    );

    Ok(RunSummary {
        files: scan.files.len(),
        identifiers,
        batches: batches.len(),
        rows_returned,
        rows_written: merged.len(),
        output: config.output.clone(),
    })
}
