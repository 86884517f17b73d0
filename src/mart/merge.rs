use crate::error::{BamMartError, Result};
use crate::mart::ResultTable;

/// Concatenate per-batch tables in submission order
///
/// # Arguments
/// * `columns` - Columns every table with rows must carry; tables with no
///   rows contribute nothing and are not checked
/// * `tables` - Batch results, first batch first
///
/// # Returns
/// * One table whose rows are the inputs' rows back to back
pub fn merge_tables<I>(columns: Vec<String>, tables: I) -> Result<ResultTable>
where
    I: IntoIterator<Item = ResultTable>,
{
    let mut merged = ResultTable::new(columns);
    for table in tables {
        if table.is_empty() {
            continue;
        }
        if table.columns != merged.columns {
            return Err(BamMartError::ColumnMismatch {
                expected: merged.columns,
                found: table.columns,
            });
        }
        merged.rows.extend(table.rows);
    }
    Ok(merged)
}
