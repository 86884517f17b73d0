use crate::config::HelperConfig;
use crate::error::Result;
use crate::mart::{AnnotationService, Schema};
use serde::Serialize;
use tracing::info;

/// Schema names containing a search term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaMatches {
    pub term: String,
    pub attributes: Vec<String>,
    pub filters: Vec<String>,
}

/// Case-sensitive substring search over attribute and filter names
pub fn search_schema(schema: &Schema, term: &str) -> SchemaMatches {
    let matching = |names: &[String]| -> Vec<String> {
        names.iter().filter(|n| n.contains(term)).cloned().collect()
    };

    SchemaMatches {
        term: term.to_string(),
        attributes: matching(&schema.attributes),
        filters: matching(&schema.filters),
    }
}

/// Fetch the schema from `service` and search it
pub fn run_helper<S: AnnotationService>(config: &HelperConfig, service: &S) -> Result<SchemaMatches> {
    config.validate()?;
    info!(
        "Searching {} schema for '{}'",
        config.target.dataset, config.search_term
    );
    let schema = service.schema()?;
    info!(
        "Schema lists {} attributes and {} filters",
        schema.attributes.len(),
        schema.filters.len()
    );
    Ok(search_schema(&schema, &config.search_term))
}

/// Plain-text report, one section per name kind
pub fn render_text(matches: &SchemaMatches) -> String {
    let mut out = String::new();
    if matches.attributes.is_empty() {
        out.push_str("No Attributes\n");
    } else {
        out.push_str("Attributes:\n");
        for name in &matches.attributes {
            out.push_str(&format!("  {}\n", name));
        }
    }
    if matches.filters.is_empty() {
        out.push_str("No Filters\n");
    } else {
        out.push_str("Filters:\n");
        for name in &matches.filters {
            out.push_str(&format!("  {}\n", name));
        }
    }
    out
}
