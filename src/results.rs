use serde::{Deserialize, Serialize};

/// An image written by a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedImage {
    /// File or object name
    pub name: String,

    /// Local path or `gs://bucket/name` URI
    pub location: String,
}

/// Summary of one harvesting run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestReport {
    /// Requested number of images (an upper bound)
    pub requested: usize,

    /// Candidates taken from the page before the run ended
    pub candidates: usize,

    /// Candidates skipped without producing an image
    pub skipped: usize,

    /// Images persisted, in page order
    pub written: Vec<PersistedImage>,
}

impl HarvestReport {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    /// Whether fewer images were produced than requested
    pub fn is_short(&self) -> bool {
        self.written.len() < self.requested
    }
}
