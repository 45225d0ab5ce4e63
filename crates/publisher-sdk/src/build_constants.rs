//! Build constants for the publisher package, resolved at compile time.

/// Source control information.
pub struct Source;

impl Source {
    /// The commit hash from which this binary was built.
    /// Set via the `PUBLISHER_COMMIT_HASH` env var at compile time, or "N/A".
    pub const COMMIT_HASH: &'static str = match option_env!("PUBLISHER_COMMIT_HASH") {
        Some(h) => h,
        None => "N/A",
    };
}

/// Publisher package metadata.
#[derive(Debug, Clone)]
pub struct PublisherPackage;

impl PublisherPackage {
    /// The semantic version, from `CARGO_PKG_VERSION`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Name reported in logs and the `--version` banner.
    pub const NAME: &'static str = "artifact-publisher";
}
