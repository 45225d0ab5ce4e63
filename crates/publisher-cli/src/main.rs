// publish: Command-line entry point for the artifact publisher.
//
// Usage:
//   publish <bucket-name> [region]
//
// Uploads the extraction package, dependency layer and infrastructure
// template to the bucket (creating it if needed), then lists each
// destination prefix. Exits 0 on success and 1 on any failure, with a single
// `<Kind>: <message>` line on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use publisher_core::artifact::ArtifactNames;
use publisher_core::config::{
    DEFAULT_EXTRACTION_PACKAGE, DEFAULT_LAYER_PACKAGE, DEFAULT_TEMPLATE, ENDPOINT_URL_ENV,
    KEY_PREFIX_ENV,
};
use publisher_core::{ArtifactPublisher, PublishError, PublishSettings, S3ObjectStore};
use publisher_sdk::trace::TracingTraceWriter;
use publisher_sdk::{PublisherPackage, Source};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "publish",
    version = PublisherPackage::VERSION,
    about = "Publish the extraction package, dependency layer and infrastructure template to an S3 bucket"
)]
struct Args {
    /// Destination bucket; created if it does not exist.
    bucket: Option<String>,

    /// Bucket region [default: us-east-1].
    region: Option<String>,

    /// Directory the artifact files are read from.
    #[arg(long, default_value = ".")]
    artifacts_dir: PathBuf,

    /// Extraction function package, uploaded under `lambda/`.
    #[arg(long, default_value = DEFAULT_EXTRACTION_PACKAGE)]
    extraction_package: String,

    /// Dependency layer package, uploaded under `layers/`.
    #[arg(long, default_value = DEFAULT_LAYER_PACKAGE)]
    layer_package: String,

    /// Infrastructure template, uploaded under `plantillas/`.
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Root prefix placed in front of every object key.
    #[arg(long, env = KEY_PREFIX_ENV)]
    key_prefix: Option<String>,

    /// Custom endpoint for S3-compatible storage.
    #[arg(long, env = ENDPOINT_URL_ENV)]
    endpoint_url: Option<String>,

    /// Use path-style addressing (needed by most S3-compatible services).
    #[arg(long)]
    force_path_style: bool,

    /// Write a JSON publish report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log every stage transition and upload detail.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_settings(self) -> PublishSettings {
        PublishSettings {
            bucket: self.bucket,
            region: self.region,
            artifacts_dir: self.artifacts_dir,
            names: ArtifactNames {
                extraction_package: self.extraction_package,
                dependency_layer: self.layer_package,
                infrastructure_template: self.template,
            },
            key_prefix: self.key_prefix,
            endpoint_url: self.endpoint_url,
            force_path_style: self.force_path_style,
            report_path: self.report,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    tracing::debug!(
        "{} {} (commit {})",
        PublisherPackage::NAME,
        PublisherPackage::VERSION,
        Source::COMMIT_HASH
    );

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args.into_settings())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_operator_line());
            ExitCode::FAILURE
        }
    }
}

/// The publisher runs single-threaded; uploads are sequential anyway.
fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")
}

async fn run(settings: PublishSettings) -> Result<(), PublishError> {
    // Fails on a missing bucket or artifact before any client is built.
    let request = settings.into_request()?;

    let store = S3ObjectStore::connect(&settings.store_config()).await;
    let publisher = ArtifactPublisher::new(Arc::new(store));
    let report = publisher.publish(&TracingTraceWriter, &request).await?;

    for line in report.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &settings.report_path {
        report.save(path)?;
        tracing::info!("Publish report written to {}", path.display());
    }

    Ok(())
}
