/// A bounded group of identifiers submitted in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based position in submission order
    pub index: usize,
    pub ids: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Split identifiers into consecutive batches of at most `batch_size`
///
/// # Arguments
/// * `ids` - Identifiers in submission order (sorted for reproducible runs)
/// * `batch_size` - Maximum identifiers per batch, must be non-zero
///
/// # Returns
/// * Batches covering every identifier exactly once; only the last may be short
pub fn make_batches<I, S>(ids: I, batch_size: usize) -> Vec<Batch>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    assert!(batch_size > 0, "batch size must be non-zero");

    let mut batches = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for id in ids {
        current.push(id.into());
        if current.len() == batch_size {
            let full = std::mem::take(&mut current);
            batches.push(Batch { index: batches.len() + 1, ids: full });
        }
    }

    if !current.is_empty() {
        batches.push(Batch { index: batches.len() + 1, ids: current });
    }

    batches
}
