// PublishReport – the record of one successful publish run.

use chrono::{DateTime, Utc};
use publisher_sdk::IOUtil;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::artifact::ArtifactKind;
use crate::error::PublishError;

/// Format of [`PublishReport::run_id`].
pub const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One artifact written to the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedArtifact {
    pub kind: ArtifactKind,
    pub local_path: PathBuf,
    pub key: String,
    pub size_bytes: u64,
    /// Hex SHA-256 of the local file at upload time.
    pub sha256: String,
    pub content_type: String,
}

/// Result of listing one destination prefix after the uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixListing {
    pub prefix: String,
    pub keys: Vec<String>,
    /// Set when the listing itself failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    pub run_id: String,
    pub published_at: DateTime<Utc>,
    pub bucket: String,
    pub region: String,
    /// Whether this run created the bucket.
    pub bucket_created: bool,
    pub uploads: Vec<UploadedArtifact>,
    pub verification: Vec<PrefixListing>,
    /// Non-fatal verification problems, one line each.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl PublishReport {
    pub fn new(bucket: &str, region: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            run_id: published_at.format(RUN_ID_FORMAT).to_string(),
            published_at,
            bucket: bucket.to_string(),
            region: region.to_string(),
            bucket_created: false,
            uploads: Vec::new(),
            verification: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// True when every listing succeeded and no upload went missing.
    pub fn is_fully_verified(&self) -> bool {
        self.warnings.is_empty() && self.verification.iter().all(|l| l.error.is_none())
    }

    /// Human-readable summary printed at the end of a run.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.uploads.len() + 2);
        lines.push(format!(
            "Published {} artifact(s) to s3://{} ({}){}",
            self.uploads.len(),
            self.bucket,
            self.region,
            if self.bucket_created {
                ", bucket created"
            } else {
                ""
            }
        ));
        for upload in &self.uploads {
            lines.push(format!(
                "  {} -> s3://{}/{} ({} bytes, sha256 {})",
                upload.local_path.display(),
                self.bucket,
                upload.key,
                upload.size_bytes,
                upload.sha256,
            ));
        }
        if !self.is_fully_verified() {
            lines.push(format!(
                "Verification reported {} warning(s)",
                self.warnings.len()
            ));
        }
        lines
    }

    /// Write the report as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), PublishError> {
        IOUtil::save_object(path, self).map_err(|e| PublishError::Report {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })
    }
}
