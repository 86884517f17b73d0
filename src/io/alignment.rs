// src/io/alignment.rs
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::RecordBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::IdSource;
use crate::error::{BamMartError, Result};

const ALIGNMENT_EXTENSIONS: [&str; 2] = ["bam", "sam"];
const GENE_ID_PREFIX: &[u8] = b"ENSG";

/// Identifiers collected from every alignment file under a root directory
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    /// Sorted and unique across all files
    pub ids: BTreeSet<String>,
}

/// Recursively list .bam and .sam files under `root`, sorted by path
pub fn find_alignment_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(BamMartError::file_access(root, "directory does not exist"));
    }
    if !root.is_dir() {
        return Err(BamMartError::file_access(root, "not a directory"));
    }

    info!("Checking for alignment files under {}", root.display());
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| BamMartError::file_access(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|v| v.to_str()) else {
            continue;
        };
        if ALIGNMENT_EXTENSIONS.contains(&ext) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    info!("Found {} alignment files", files.len());
    Ok(files)
}

/// Scan every alignment file under `root` and merge their identifiers
///
/// # Arguments
/// * `root` - Directory searched recursively
/// * `source` - Record field the identifier is taken from
///
/// # Returns
/// * The files read and the deduplicated identifier set
pub fn extract_identifiers(root: &Path, source: IdSource) -> Result<ScanResult> {
    let files = find_alignment_files(root)?;
    if files.is_empty() {
        return Err(BamMartError::NoAlignmentFiles { root: root.to_path_buf() });
    }

    let mut ids = BTreeSet::new();
    for (i, path) in files.iter().enumerate() {
        info!("Processing file {}/{}: {}", i + 1, files.len(), path.display());
        let file_ids = read_identifiers(path, source)
            .map_err(|e| BamMartError::file_access(path, e))?;
        info!("Found {} unique ids in {}", file_ids.len(), path.display());
        ids.extend(file_ids);
    }

    info!(
        "Found {} total unique ids across {} files",
        ids.len(),
        files.len()
    );
    Ok(ScanResult { files, ids })
}

/// Read the identifiers of one BAM or SAM file
pub fn read_identifiers(path: &Path, source: IdSource) -> io::Result<BTreeSet<String>> {
    let is_sam = path
        .extension()
        .and_then(|v| v.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sam"));

    let mut ids = BTreeSet::new();
    let mut records = 0usize;

    if is_sam {
        let mut reader = File::open(path)
            .map(BufReader::new)
            .map(sam::io::Reader::new)?;
        let header = reader.read_header()?;
        for result in reader.record_bufs(&header) {
            let record = result?;
            records += 1;
            if let Some(id) = record_identifier(&record, &header, source) {
                ids.insert(id);
            }
        }
    } else {
        let mut reader = File::open(path).map(bam::io::Reader::new)?;
        let header = reader.read_header()?;
        for result in reader.record_bufs(&header) {
            let record = result?;
            records += 1;
            if let Some(id) = record_identifier(&record, &header, source) {
                ids.insert(id);
            }
        }
    }

    debug!("{}: {} records, {} ids", path.display(), records, ids.len());
    Ok(ids)
}

/// Identifier of a mapped record, if it carries one
pub fn record_identifier(
    record: &RecordBuf,
    header: &sam::Header,
    source: IdSource,
) -> Option<String> {
    if record.flags().is_unmapped() {
        return None;
    }

    match source {
        IdSource::Reference => {
            let id = record.reference_sequence_id()?;
            header
                .reference_sequences()
                .get_index(id)
                .map(|(name, _)| name.to_string())
        }
        IdSource::GeneTag => gene_tag(record),
    }
}

// GX is preferred over GE, GE over GN.
fn gene_tag(record: &RecordBuf) -> Option<String> {
    let tags = [
        Tag::new(b'G', b'X'),
        Tag::new(b'G', b'E'),
        Tag::new(b'G', b'N'),
    ];

    tags.iter().find_map(|tag| match record.data().get(tag) {
        Some(Value::String(value)) if value.starts_with(GENE_ID_PREFIX) => {
            Some(value.to_string())
        }
        _ => None,
    })
}
