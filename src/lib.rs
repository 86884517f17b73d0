//! Extract transcript/gene identifiers from alignment files and annotate
//! them in batches through Ensembl BioMart.

pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod mart;
pub mod pipeline;

pub use error::{BamMartError, Result};
