// publisher-core: The artifact publish workflow.
// Builds the fixed upload manifest, talks to object storage through the
// `ObjectStore` port and produces a `PublishReport` for each run.

pub mod artifact;
pub mod config;
pub mod error;
pub mod publisher;
pub mod report;
pub mod store;

// Re-exports for convenient access
pub use artifact::{ArtifactFile, ArtifactKind, ArtifactNames, KeyLayout, UploadManifest};
pub use config::{PublishSettings, DEFAULT_REGION};
pub use error::{ErrorKind, PublishError, StoreError};
pub use publisher::{ArtifactPublisher, PublishRequest, PublishStage};
pub use report::{PrefixListing, PublishReport, UploadedArtifact};
pub use store::{InMemoryObjectStore, ObjectStore, S3ObjectStore, S3StoreConfig};
