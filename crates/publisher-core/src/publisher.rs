// ArtifactPublisher – validate, ensure the bucket, upload, verify.
//
// The run is strictly linear:
//
//   Validating -> EnsuringBucket -> Uploading(0..n) -> Verifying -> Done
//
// and any fatal error moves it to Failed(kind). Uploads are sequential and
// the first failure stops the run; objects already written stay in place.

use chrono::Utc;
use publisher_sdk::{IOUtil, TraceWriter};
use std::fmt;
use std::sync::Arc;

use crate::artifact::{ArtifactFile, UploadManifest};
use crate::error::{ErrorKind, PublishError, StoreError};
use crate::report::{PrefixListing, PublishReport, UploadedArtifact};
use crate::store::ObjectStore;

/// A validated publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub bucket: String,
    pub region: String,
    pub manifest: UploadManifest,
}

impl PublishRequest {
    /// Re-check the request; the local files may have changed since it was
    /// built.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.bucket.trim().is_empty() {
            return Err(PublishError::MissingArgument("bucket-name"));
        }
        self.manifest.validate()
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Validating,
    EnsuringBucket,
    /// Uploading the manifest entry at this index.
    Uploading(usize),
    Verifying,
    Done,
    Failed(ErrorKind),
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStage::Validating => f.write_str("Validating"),
            PublishStage::EnsuringBucket => f.write_str("EnsuringBucket"),
            PublishStage::Uploading(i) => write!(f, "Uploading({i})"),
            PublishStage::Verifying => f.write_str("Verifying"),
            PublishStage::Done => f.write_str("Done"),
            PublishStage::Failed(kind) => write!(f, "Failed({kind})"),
        }
    }
}

/// Publishes the artifact manifest to an object store.
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Run the whole workflow for `request`.
    ///
    /// Verification problems never fail the run; they are logged as warnings
    /// and recorded in the returned report.
    pub async fn publish(
        &self,
        trace: &dyn TraceWriter,
        request: &PublishRequest,
    ) -> Result<PublishReport, PublishError> {
        match self.run(trace, request).await {
            Ok(report) => {
                enter(trace, PublishStage::Done);
                Ok(report)
            }
            Err(e) => {
                enter(trace, PublishStage::Failed(e.kind()));
                trace.error(&e.to_operator_line());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        trace: &dyn TraceWriter,
        request: &PublishRequest,
    ) -> Result<PublishReport, PublishError> {
        // -----------------------------------------------------------
        // 1. Validate before any storage call
        // -----------------------------------------------------------

        enter(trace, PublishStage::Validating);
        request.validate()?;

        let mut report = PublishReport::new(&request.bucket, &request.region, Utc::now());

        // -----------------------------------------------------------
        // 2. Ensure the bucket exists
        // -----------------------------------------------------------

        enter(trace, PublishStage::EnsuringBucket);
        report.bucket_created = self.ensure_bucket(trace, request).await?;

        // -----------------------------------------------------------
        // 3. Upload, in manifest order
        // -----------------------------------------------------------

        for (index, entry) in request.manifest.entries().iter().enumerate() {
            enter(trace, PublishStage::Uploading(index));
            let uploaded = self.upload(trace, &request.bucket, entry).await?;
            report.uploads.push(uploaded);
        }

        // -----------------------------------------------------------
        // 4. Verify by listing each destination prefix
        // -----------------------------------------------------------

        enter(trace, PublishStage::Verifying);
        self.verify(trace, request, &mut report).await;

        Ok(report)
    }

    /// Returns whether the bucket had to be created.
    async fn ensure_bucket(
        &self,
        trace: &dyn TraceWriter,
        request: &PublishRequest,
    ) -> Result<bool, PublishError> {
        let bucket = &request.bucket;
        let region = &request.region;
        let creation_failed = |source: StoreError| PublishError::BucketCreationFailed {
            bucket: bucket.clone(),
            region: region.clone(),
            source,
        };

        if self
            .store
            .bucket_exists(bucket)
            .await
            .map_err(|source| PublishError::BucketCheckFailed {
                bucket: bucket.clone(),
                source,
            })?
        {
            trace.info(&format!("Bucket '{bucket}' already exists"));
            return Ok(false);
        }

        trace.info(&format!("Creating bucket '{bucket}' in {region}"));
        self.store
            .create_bucket(bucket, region)
            .await
            .map_err(creation_failed)?;
        trace.info(&format!("Bucket '{bucket}' created"));
        Ok(true)
    }

    async fn upload(
        &self,
        trace: &dyn TraceWriter,
        bucket: &str,
        entry: &ArtifactFile,
    ) -> Result<UploadedArtifact, PublishError> {
        let upload_failed = |source: StoreError| PublishError::UploadFailed {
            path: entry.local_path.clone(),
            key: entry.destination_key.clone(),
            source,
        };
        let read_failed = |source: std::io::Error| {
            upload_failed(StoreError::Read {
                path: entry.local_path.clone(),
                source,
            })
        };

        let size_bytes = tokio::fs::metadata(&entry.local_path)
            .await
            .map_err(read_failed)?
            .len();
        let hash_path = entry.local_path.clone();
        let sha256 = tokio::task::spawn_blocking(move || IOUtil::sha256_file(&hash_path))
            .await
            .map_err(|e| read_failed(std::io::Error::other(e)))?
            .map_err(|e| read_failed(std::io::Error::other(format!("{e:#}"))))?;
        let content_type = entry.content_type();

        trace.info(&format!(
            "Uploading {} '{}' to s3://{bucket}/{}",
            entry.kind,
            entry.local_path.display(),
            entry.destination_key,
        ));
        self.store
            .put_object(bucket, &entry.destination_key, &entry.local_path, content_type)
            .await
            .map_err(upload_failed)?;
        trace.verbose(&format!(
            "Uploaded {size_bytes} bytes, sha256 {sha256}, content type {content_type}"
        ));

        Ok(UploadedArtifact {
            kind: entry.kind,
            local_path: entry.local_path.clone(),
            key: entry.destination_key.clone(),
            size_bytes,
            sha256,
            content_type: content_type.to_string(),
        })
    }

    async fn verify(
        &self,
        trace: &dyn TraceWriter,
        request: &PublishRequest,
        report: &mut PublishReport,
    ) {
        for prefix in request.manifest.destination_prefixes() {
            match self.store.list_keys(&request.bucket, &prefix).await {
                Ok(keys) => {
                    trace.info(&format!(
                        "s3://{}/{prefix}: {} object(s)",
                        request.bucket,
                        keys.len()
                    ));
                    for key in &keys {
                        trace.info(&format!("  {key}"));
                    }
                    for upload in report.uploads.iter().filter(|u| u.key.starts_with(&prefix)) {
                        if !keys.contains(&upload.key) {
                            let warning = format!(
                                "{}: '{}' not listed under '{prefix}'",
                                ErrorKind::VerificationFailed,
                                upload.key
                            );
                            trace.warning(&warning);
                            report.warnings.push(warning);
                        }
                    }
                    report.verification.push(PrefixListing {
                        prefix,
                        keys,
                        error: None,
                    });
                }
                Err(e) => {
                    let warning = format!(
                        "{}: listing '{prefix}' failed: {e}",
                        ErrorKind::VerificationFailed
                    );
                    trace.warning(&warning);
                    report.warnings.push(warning);
                    report.verification.push(PrefixListing {
                        prefix,
                        keys: Vec::new(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }
    }
}

fn enter(trace: &dyn TraceWriter, stage: PublishStage) {
    trace.verbose(&format!("stage: {stage}"));
}
