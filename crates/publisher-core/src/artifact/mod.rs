// Artifact module – what gets published and where it lands in the bucket.

pub mod layout;
pub mod manifest;

pub use layout::{ArtifactKind, KeyLayout};
pub use manifest::{content_type_for, ArtifactFile, ArtifactNames, UploadManifest};
