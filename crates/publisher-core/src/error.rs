// Error taxonomy for the publish workflow.
//
// `PublishError` carries one variant per fatal failure; `ErrorKind` is the flat
// classification printed to the operator and used for the non-fatal
// verification warnings.

use std::fmt;
use std::path::PathBuf;

/// Flat classification of publish failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    MissingArgument,
    MissingArtifact,
    BucketCreationFailed,
    UploadFailed,
    /// Never aborts a run; only logged and recorded in the report.
    VerificationFailed,
    /// The optional report file could not be written.
    ReportFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingArgument => "MissingArgument",
            ErrorKind::MissingArtifact => "MissingArtifact",
            ErrorKind::BucketCreationFailed => "BucketCreationFailed",
            ErrorKind::UploadFailed => "UploadFailed",
            ErrorKind::VerificationFailed => "VerificationFailed",
            ErrorKind::ReportFailed => "ReportFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by an [`ObjectStore`](crate::store::ObjectStore) adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage service rejected or failed the request.
    #[error("{operation} failed for '{target}': {message}")]
    Service {
        operation: &'static str,
        target: String,
        message: String,
    },

    /// The local file backing an upload could not be read.
    #[error("failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn service(
        operation: &'static str,
        target: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        StoreError::Service {
            operation,
            target: target.into(),
            message: message.to_string(),
        }
    }
}

/// A fatal publish failure.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("local artifact not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// The existence check failed with something other than "not found".
    /// Classified with creation failures; creation is never attempted.
    #[error("could not check bucket '{bucket}'")]
    BucketCheckFailed {
        bucket: String,
        #[source]
        source: StoreError,
    },

    #[error("could not create bucket '{bucket}' in {region}")]
    BucketCreationFailed {
        bucket: String,
        region: String,
        #[source]
        source: StoreError,
    },

    #[error("upload of '{}' to '{key}' failed", path.display())]
    UploadFailed {
        path: PathBuf,
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("could not write publish report to '{}': {message}", path.display())]
    Report { path: PathBuf, message: String },
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::MissingArgument(_) => ErrorKind::MissingArgument,
            PublishError::MissingArtifact { .. } => ErrorKind::MissingArtifact,
            PublishError::BucketCheckFailed { .. } | PublishError::BucketCreationFailed { .. } => {
                ErrorKind::BucketCreationFailed
            }
            PublishError::UploadFailed { .. } => ErrorKind::UploadFailed,
            PublishError::Report { .. } => ErrorKind::ReportFailed,
        }
    }

    /// One-line operator message: `<Kind>: <message>[: <cause>]`.
    pub fn to_operator_line(&self) -> String {
        let mut line = format!("{}: {}", self.kind(), self);
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            line.push_str(": ");
            line.push_str(&cause.to_string());
            source = cause.source();
        }
        line.replace('\n', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_from_variants() {
        assert_eq!(
            PublishError::MissingArgument("bucket-name").kind(),
            ErrorKind::MissingArgument
        );
        assert_eq!(
            PublishError::MissingArtifact {
                path: PathBuf::from("template.yml")
            }
            .kind(),
            ErrorKind::MissingArtifact
        );
    }

    #[test]
    fn failed_check_reads_as_check_not_creation() {
        let err = PublishError::BucketCheckFailed {
            bucket: "demo-bucket".into(),
            source: StoreError::service("head_bucket", "demo-bucket", "HTTP 403: Forbidden"),
        };
        assert_eq!(err.kind(), ErrorKind::BucketCreationFailed);
        assert_eq!(
            err.to_operator_line(),
            "BucketCreationFailed: could not check bucket 'demo-bucket': \
             head_bucket failed for 'demo-bucket': HTTP 403: Forbidden"
        );
    }

    #[test]
    fn operator_line_names_kind_and_file() {
        let err = PublishError::MissingArtifact {
            path: PathBuf::from("./template.yml"),
        };
        assert_eq!(
            err.to_operator_line(),
            "MissingArtifact: local artifact not found: ./template.yml"
        );
    }

    #[test]
    fn operator_line_includes_cause_chain() {
        let err = PublishError::UploadFailed {
            path: PathBuf::from("layer.zip"),
            key: "layers/layer.zip".into(),
            source: StoreError::service("put_object", "layers/layer.zip", "AccessDenied"),
        };
        let line = err.to_operator_line();
        assert!(line.starts_with("UploadFailed: upload of 'layer.zip'"));
        assert!(line.ends_with("put_object failed for 'layers/layer.zip': AccessDenied"));
    }
}
