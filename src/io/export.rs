use crate::mart::ResultTable;
use std::borrow::Cow;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a result table as CSV
///
/// The table is written to a temporary file next to `output_path` and
/// renamed into place once complete, so a failure leaves no partial file.
pub fn export_table_csv(table: &ResultTable, output_path: &Path) -> io::Result<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        write_table_csv(table, &mut writer)?;
        writer.flush()?;
    }

    tmp.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}

/// Serialize a table as CSV: header row of column names, then one line per row
pub fn write_table_csv<W: Write>(table: &ResultTable, writer: &mut W) -> io::Result<()> {
    write_csv_line(writer, table.columns.iter().map(String::as_str))?;
    for row in &table.rows {
        write_csv_line(writer, row.values.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_csv_line<'a, W, I>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    let line = fields.map(escape_csv_field).collect::<Vec<_>>().join(",");
    writeln!(writer, "{}", line)
}

/// Quote a field when it holds a delimiter, quote, or line break
pub fn escape_csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
