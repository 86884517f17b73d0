use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use bammart::config::{
    ColumnNaming, HelperConfig, IdSource, MartTarget, QueryConfig, DEFAULT_BATCH_SIZE,
    DEFAULT_DATASET, DEFAULT_FILTER, DEFAULT_HOST,
};

#[derive(Parser, Debug)]
#[command(
    name = "bammart",
    version,
    about = "Read transcript ids from BAM files and translate them through Ensembl BioMart",
    long_about = "Reads transcript/gene ids from every BAM file under a directory and queries \
BioMart for the requested attributes. If you don't know the name of a filter or attribute, \
try ensembl_gene_id or run `bammart helper --search_term <term>`."
)]
pub struct Cli {
    /// Log debug-level detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the BioMart query over every alignment file under a directory
    Query(QueryArgs),

    /// Search BioMart attribute and filter names
    Helper(HelperArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Root directory searched recursively for .bam/.sam files
    #[arg(short, long = "root_dir")]
    pub root_dir: PathBuf,

    /// BioMart filter the ids are matched on (link_ensembl_transcript_stable_id for ENSTs)
    #[arg(short, long, default_value = DEFAULT_FILTER)]
    pub filter: String,

    /// Attributes to fetch, comma separated or repeated (e.g. transcript_biotype)
    #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Ids sent per request; BioMart suggests fewer than 500
    #[arg(short, long = "batch_size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// BioMart dataset
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// BioMart host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Where ids come from in each alignment record
    #[arg(long = "id_source", value_enum, default_value_t = IdSource::Reference)]
    pub id_source: IdSource,

    /// Header naming: requested attribute names or service display names
    #[arg(long = "column_names", value_enum, default_value_t = ColumnNaming::Attribute)]
    pub column_names: ColumnNaming,

    /// Keep rows with empty values instead of dropping them
    #[arg(long = "keep_incomplete")]
    pub keep_incomplete: bool,
}

#[derive(Args, Debug)]
pub struct HelperArgs {
    /// Returns the attributes and filters containing this term
    #[arg(short, long = "search_term")]
    pub search_term: String,

    /// BioMart dataset
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// BioMart host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl QueryArgs {
    pub fn to_config(&self) -> QueryConfig {
        QueryConfig {
            root_dir: self.root_dir.clone(),
            filter: self.filter.clone(),
            attributes: self.attributes.iter().map(|a| a.trim().to_string()).collect(),
            output: self.output.clone(),
            batch_size: self.batch_size,
            target: MartTarget {
                host: self.host.clone(),
                dataset: self.dataset.clone(),
            },
            id_source: self.id_source,
            column_naming: self.column_names,
            keep_incomplete: self.keep_incomplete,
        }
    }
}

impl HelperArgs {
    pub fn to_config(&self) -> HelperConfig {
        HelperConfig {
            search_term: self.search_term.clone(),
            target: MartTarget {
                host: self.host.clone(),
                dataset: self.dataset.clone(),
            },
        }
    }
}
