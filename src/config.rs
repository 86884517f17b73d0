use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{BamMartError, Result};

/// BioMart suggests keeping requests under 500 ids.
pub const DEFAULT_BATCH_SIZE: usize = 400;
pub const DEFAULT_FILTER: &str = "link_ensembl_transcript_stable_id";
pub const DEFAULT_DATASET: &str = "hsapiens_gene_ensembl";
pub const DEFAULT_HOST: &str = "http://www.ensembl.org";

/// Which part of an alignment record yields the identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdSource {
    /// Reference sequence name of mapped reads (transcript ids for
    /// transcriptome alignments)
    #[default]
    Reference,
    /// First GX/GE/GN tag value that looks like an Ensembl gene id
    GeneTag,
}

/// How the output header is named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnNaming {
    /// Requested attribute names, as given on the command line
    #[default]
    Attribute,
    /// Service display names, normalized to snake_case
    Display,
}

/// Connection settings shared by both commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MartTarget {
    pub host: String,
    pub dataset: String,
}

impl Default for MartTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
        }
    }
}

/// Everything the `query` pipeline needs.
#[derive(Clone, Debug)]
pub struct QueryConfig {
    /// Directory searched recursively for alignment files.
    pub root_dir: PathBuf,
    /// BioMart filter the identifiers are matched against.
    pub filter: String,
    /// Attributes fetched for every identifier.
    pub attributes: Vec<String>,
    /// CSV destination.
    pub output: PathBuf,
    /// Identifiers per request.
    pub batch_size: usize,
    pub target: MartTarget,
    pub id_source: IdSource,
    pub column_naming: ColumnNaming,
    /// Keep rows that have an empty value.
    pub keep_incomplete: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            filter: DEFAULT_FILTER.to_string(),
            attributes: Vec::new(),
            output: PathBuf::from("bammart.csv"),
            batch_size: DEFAULT_BATCH_SIZE,
            target: MartTarget::default(),
            id_source: IdSource::default(),
            column_naming: ColumnNaming::default(),
            keep_incomplete: false,
        }
    }
}

impl QueryConfig {
    /// Reject settings that would make the run meaningless before any
    /// file is touched.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BamMartError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.filter.trim().is_empty() {
            return Err(BamMartError::InvalidConfig("filter name is empty".to_string()));
        }
        if self.attributes.is_empty() {
            return Err(BamMartError::InvalidConfig(
                "at least one attribute is required".to_string(),
            ));
        }
        if let Some(blank) = self.attributes.iter().position(|a| a.trim().is_empty()) {
            return Err(BamMartError::InvalidConfig(format!(
                "attribute #{} is empty",
                blank + 1
            )));
        }
        validate_target(&self.target)
    }
}

/// Settings for the `helper` schema search.
#[derive(Clone, Debug)]
pub struct HelperConfig {
    pub search_term: String,
    pub target: MartTarget,
}

impl HelperConfig {
    pub fn validate(&self) -> Result<()> {
        if self.search_term.is_empty() {
            return Err(BamMartError::InvalidConfig("search term is empty".to_string()));
        }
        validate_target(&self.target)
    }
}

fn validate_target(target: &MartTarget) -> Result<()> {
    if !(target.host.starts_with("http://") || target.host.starts_with("https://")) {
        return Err(BamMartError::InvalidConfig(format!(
            "host '{}' must start with http:// or https://",
            target.host
        )));
    }
    if target.dataset.trim().is_empty() {
        return Err(BamMartError::InvalidConfig("dataset name is empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> QueryConfig {
        QueryConfig {
            attributes: vec!["transcript_biotype".to_string()],
            ..QueryConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.batch_size, 400);
        assert_eq!(config.filter, "link_ensembl_transcript_stable_id");
        assert_eq!(config.target.dataset, "hsapiens_gene_ensembl");
        assert_eq!(config.target.host, "http://www.ensembl.org");
        assert_eq!(config.id_source, IdSource::Reference);
        assert!(!config.keep_incomplete);
    }

    #[test]
    fn test_validate_accepts_defaults_with_attributes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config = QueryConfig { batch_size: 0, ..valid_config() };
        assert!(matches!(config.validate(), Err(BamMartError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_missing_or_blank_attributes() {
        let none = QueryConfig::default();
        assert!(none.validate().is_err());

        let blank = QueryConfig {
            attributes: vec!["ensembl_gene_id".to_string(), " ".to_string()],
            ..QueryConfig::default()
        };
        let err = blank.validate().unwrap_err();
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let mut config = valid_config();
        config.target.host = "www.ensembl.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_helper_requires_term() {
        let helper = HelperConfig {
            search_term: String::new(),
            target: MartTarget::default(),
        };
        assert!(helper.validate().is_err());
    }
}
