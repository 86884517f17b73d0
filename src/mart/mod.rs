//! BioMart access - query building, response parsing, and the HTTP client

pub mod client;
pub mod merge;
pub mod query;

use serde::Serialize;

use crate::batch::Batch;
use crate::config::ColumnNaming;
use crate::error::Result;

pub use client::BiomartClient;
pub use merge::merge_tables;

/// One response row: a value per column, empty when the service had none
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub values: Vec<String>,
}

impl AttributeRow {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| !v.trim().is_empty())
    }
}

/// Column names plus rows in the order the service returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<AttributeRow>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove rows with any empty value, returning how many were dropped
    pub fn drop_incomplete(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(AttributeRow::is_complete);
        before - self.rows.len()
    }
}

/// Attribute and filter names a dataset publishes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: Vec<String>,
    pub filters: Vec<String>,
}

/// A remote service that annotates identifiers.
///
/// `BiomartClient` talks to Ensembl; tests substitute in-memory stubs.
pub trait AnnotationService {
    /// Fetch `attributes` for every identifier in `batch` matched on `filter`
    fn query_batch(
        &self,
        filter: &str,
        batch: &Batch,
        attributes: &[String],
        naming: ColumnNaming,
    ) -> Result<ResultTable>;

    /// List the dataset's attribute and filter names
    fn schema(&self) -> Result<Schema>;
}
