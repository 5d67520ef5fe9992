pub mod gcs;

pub use gcs::GcsClient;

use crate::error::Result;
use async_trait::async_trait;

/// A bucket-addressed object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` as object `name` with the given content type
    async fn upload(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<()>;

    /// Bucket objects are written to
    fn bucket(&self) -> &str;
}
