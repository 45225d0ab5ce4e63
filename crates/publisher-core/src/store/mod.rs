// Object store port – the four storage operations the publisher needs.
//
// `s3` talks to S3 (or an S3-compatible endpoint); `memory` is a recording
// in-process store used by tests.

use async_trait::async_trait;
use std::path::Path;

use crate::error::StoreError;

pub mod memory;
pub mod s3;

pub use memory::{InMemoryObjectStore, StoreCall};
pub use s3::{S3ObjectStore, S3StoreConfig};

/// Storage operations used by [`ArtifactPublisher`](crate::ArtifactPublisher).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether `bucket` exists and is accessible. A definite "not found" is
    /// `Ok(false)`; any other failure is an error.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// Create `bucket` in `region`.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StoreError>;

    /// Write the contents of `source` to `bucket/key`, overwriting any
    /// existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// All keys under `prefix`, in lexicographic order.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError>;
}
