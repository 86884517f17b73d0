use crate::config::ColumnNaming;
use crate::error::{BamMartError, Result};
use crate::mart::{AttributeRow, ResultTable};

/// Prefix BioMart puts on error bodies, which arrive with a 200 status
pub const QUERY_ERROR_PREFIX: &str = "Query ERROR";

/// Build the XML document for one attribute query
///
/// # Arguments
/// * `dataset` - Dataset name, e.g. `hsapiens_gene_ensembl`
/// * `filter` - Filter the identifiers are matched on
/// * `ids` - Identifiers, sent comma-joined as the filter value
/// * `attributes` - Attributes requested, in column order
/// * `header` - Whether the service should emit a header row
pub fn build_query_xml(
    dataset: &str,
    filter: &str,
    ids: &[String],
    attributes: &[String],
    header: bool,
) -> String {
    let mut xml = String::with_capacity(256 + ids.iter().map(|id| id.len() + 1).sum::<usize>());
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE Query>");
    xml.push_str(&format!(
        "<Query virtualSchemaName=\"default\" formatter=\"TSV\" header=\"{}\" uniqueRows=\"1\" datasetConfigVersion=\"0.6\">",
        if header { 1 } else { 0 }
    ));
    xml.push_str(&format!(
        "<Dataset name=\"{}\" interface=\"default\">",
        escape_xml(dataset)
    ));
    xml.push_str(&format!(
        "<Filter name=\"{}\" value=\"{}\"/>",
        escape_xml(filter),
        escape_xml(&ids.join(","))
    ));
    for attribute in attributes {
        xml.push_str(&format!("<Attribute name=\"{}\"/>", escape_xml(attribute)));
    }
    xml.push_str("</Dataset></Query>");
    xml
}

/// Escape the five XML special characters for use inside attribute values
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// snake_case a service display name: "Gene stable ID " -> "gene_stable_id"
pub fn normalize_column(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// Check a response body for the in-band error marker
pub fn rejection_message(body: &str) -> Option<String> {
    let trimmed = body.trim_start();
    if trimmed.starts_with(QUERY_ERROR_PREFIX) {
        Some(trimmed.lines().take(5).collect::<Vec<_>>().join(" ").trim().to_string())
    } else {
        None
    }
}

/// Parse a TSV query response into a table
///
/// With `ColumnNaming::Attribute` the body carries no header and columns are
/// named after `attributes`. With `ColumnNaming::Display` the first line is
/// the service header, normalized.
pub fn parse_tsv_response(
    body: &str,
    attributes: &[String],
    naming: ColumnNaming,
) -> Result<ResultTable> {
    let mut lines = body
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());

    let columns = match naming {
        ColumnNaming::Attribute => attributes.to_vec(),
        ColumnNaming::Display => match lines.next() {
            Some(header) => header.split('\t').map(normalize_column).collect(),
            None => attributes.to_vec(),
        },
    };

    if columns.len() != attributes.len() {
        return Err(BamMartError::MalformedResponse(format!(
            "header has {} columns but {} attributes were requested",
            columns.len(),
            attributes.len()
        )));
    }

    let mut table = ResultTable::new(columns);
    for (line_no, line) in lines.enumerate() {
        let values: Vec<&str> = line.split('\t').collect();
        if values.len() != table.columns.len() {
            return Err(BamMartError::MalformedResponse(format!(
                "row {} has {} fields, expected {}: {}",
                line_no + 1,
                values.len(),
                table.columns.len(),
                line
            )));
        }
        table.rows.push(AttributeRow::new(values));
    }

    Ok(table)
}

/// First column of each line of a `type=attributes` / `type=filters` listing,
/// in order, without duplicates
pub fn parse_schema_listing(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in body.lines() {
        let name = line.split('\t').next().unwrap_or("").trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
