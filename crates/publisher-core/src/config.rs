// Publish settings and their defaults.
//
// `PublishSettings` is what the command line (or an embedding caller) hands
// in; `into_request` turns it into a validated `PublishRequest`.

use std::path::PathBuf;

use crate::artifact::{ArtifactNames, KeyLayout, UploadManifest};
use crate::error::PublishError;
use crate::publisher::PublishRequest;
use crate::store::S3StoreConfig;

/// Region used when none is given.
pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_EXTRACTION_PACKAGE: &str = "artefactos.zip";
pub const DEFAULT_LAYER_PACKAGE: &str = "layer.zip";
pub const DEFAULT_TEMPLATE: &str = "template.yml";

/// Optional root prefix placed in front of every destination key.
pub const KEY_PREFIX_ENV: &str = "S3_PREFIX";
/// Custom S3 endpoint for S3-compatible services.
pub const ENDPOINT_URL_ENV: &str = "AWS_ENDPOINT_URL";

/// Raw inputs for a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Directory the artifact names are resolved against.
    pub artifacts_dir: PathBuf,
    pub names: ArtifactNames,
    pub key_prefix: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    /// Where to write the JSON publish report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            bucket: None,
            region: None,
            artifacts_dir: PathBuf::from("."),
            names: ArtifactNames::default(),
            key_prefix: None,
            endpoint_url: None,
            force_path_style: false,
            report_path: None,
        }
    }
}

impl PublishSettings {
    /// The effective region; blank values fall back to [`DEFAULT_REGION`].
    pub fn region(&self) -> &str {
        match self.region.as_deref().map(str::trim) {
            Some(region) if !region.is_empty() => region,
            _ => DEFAULT_REGION,
        }
    }

    pub fn key_layout(&self) -> KeyLayout {
        KeyLayout::new(self.key_prefix.as_deref())
    }

    /// Validate the inputs and build the request.
    ///
    /// The bucket is checked first, then every local artifact. Nothing here
    /// touches storage.
    pub fn into_request(&self) -> Result<PublishRequest, PublishError> {
        // Blank counts as missing; anything else is passed through as given.
        let bucket = match self.bucket.as_deref() {
            Some(bucket) if !bucket.trim().is_empty() => bucket.to_string(),
            _ => return Err(PublishError::MissingArgument("bucket-name")),
        };

        let manifest = UploadManifest::standard(&self.artifacts_dir, &self.names, &self.key_layout());
        manifest.validate()?;

        Ok(PublishRequest {
            bucket,
            region: self.region().to_string(),
            manifest,
        })
    }

    pub fn store_config(&self) -> S3StoreConfig {
        S3StoreConfig {
            region: self.region().to_string(),
            endpoint_url: self
                .endpoint_url
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(ToOwned::to_owned),
            force_path_style: self.force_path_style,
        }
    }
}
