// S3ObjectStore – `ObjectStore` backed by the AWS S3 SDK.
//
// Works against AWS itself or any S3-compatible endpoint (MinIO, LocalStack)
// when `endpoint_url` and path-style addressing are configured.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use std::path::Path;

use crate::config::DEFAULT_REGION;
use crate::error::StoreError;

/// The one region where S3 rejects an explicit location constraint.
const US_EAST_1: &str = "us-east-1";
use crate::store::ObjectStore;

/// Connection settings for [`S3ObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3StoreConfig {
    pub region: String,
    /// Custom endpoint for S3-compatible services. `None` uses AWS.
    pub endpoint_url: Option<String>,
    /// Path-style URLs, required by most S3-compatible services.
    pub force_path_style: bool,
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from the default credential chain and `config`.
    ///
    /// No request is sent here; credentials are resolved on first use.
    pub async fn connect(config: &S3StoreConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::from_sdk_config(&sdk_config, config)
    }

    /// Build a client from an already loaded SDK config, applying the custom
    /// endpoint and addressing style from `config`.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: &S3StoreConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::debug!(
            region = %config.region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
            "S3 client configured"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

/// Location constraint for `region`, if S3 wants one.
fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region.is_empty() || region == US_EAST_1 {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Error text with the HTTP status in front, when a response came back.
fn describe<E>(err: &SdkError<E, HttpResponse>) -> String
where
    E: std::error::Error + 'static,
{
    let context = DisplayErrorContext(err);
    match err.raw_response() {
        Some(response) => format!("HTTP {}: {context}", response.status().as_u16()),
        None => context.to_string(),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = describe(&e);
                if e.into_service_error().is_not_found() {
                    Ok(false)
                } else {
                    Err(StoreError::service("head_bucket", bucket, message))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StoreError> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if let Some(configuration) = location_constraint(region) {
            request = request.create_bucket_configuration(configuration);
        }
        request
            .send()
            .await
            .map_err(|e| StoreError::service("create_bucket", bucket, describe(&e)))?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StoreError::Read {
                path: source.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::service("put_object", key, describe(&e)))?;
        Ok(())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;
        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }
            let response = request.send().await.map_err(|e| {
                StoreError::service("list_objects_v2", prefix, describe(&e))
            })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|o| o.key())
                    .map(ToOwned::to_owned),
            );

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(ToOwned::to_owned);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }
        keys.sort();
        Ok(keys)
    }
}
