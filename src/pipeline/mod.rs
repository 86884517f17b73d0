//! Pipeline module - the `query` and `helper` commands

pub mod helper;
pub mod query;

pub use helper::{run_helper, SchemaMatches};
pub use query::{run_query, RunSummary};
