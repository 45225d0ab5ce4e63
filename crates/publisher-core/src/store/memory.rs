// InMemoryObjectStore – recording, failure-injectable store for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::StoreError;
use crate::store::ObjectStore;

/// A storage call observed by [`InMemoryObjectStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    BucketExists { bucket: String },
    CreateBucket { bucket: String, region: String },
    PutObject { bucket: String, key: String },
    ListKeys { bucket: String, prefix: String },
}

/// An object held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct MemoryBucket {
    region: String,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: BTreeMap<String, MemoryBucket>,
    calls: Vec<StoreCall>,
    fail_create: Option<String>,
    fail_exists: Option<String>,
    fail_put: HashSet<String>,
    fail_list: HashSet<String>,
}

/// Object store that keeps buckets in memory and records every call.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    state: Mutex<MemoryState>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create `bucket` in `region` without recording a call.
    pub fn with_bucket(self, bucket: &str, region: &str) -> Self {
        self.state.lock().buckets.insert(
            bucket.to_string(),
            MemoryBucket {
                region: region.to_string(),
                objects: BTreeMap::new(),
            },
        );
        self
    }

    /// Make `create_bucket` fail with `message`.
    pub fn fail_bucket_creation(self, message: &str) -> Self {
        self.state.lock().fail_create = Some(message.to_string());
        self
    }

    /// Make `bucket_exists` fail with `message`.
    pub fn fail_bucket_lookup(self, message: &str) -> Self {
        self.state.lock().fail_exists = Some(message.to_string());
        self
    }

    /// Make `put_object` fail for `key`.
    pub fn fail_put(self, key: &str) -> Self {
        self.state.lock().fail_put.insert(key.to_string());
        self
    }

    /// Make `list_keys` fail for `prefix`.
    pub fn fail_list(self, prefix: &str) -> Self {
        self.state.lock().fail_list.insert(prefix.to_string());
        self
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().calls.clone()
    }

    pub fn bucket_region(&self, bucket: &str) -> Option<String> {
        self.state.lock().buckets.get(bucket).map(|b| b.region.clone())
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state
            .lock()
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key).cloned())
    }

    /// All keys in `bucket`, sorted. Empty if the bucket does not exist.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.state
            .lock()
            .buckets
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, call: StoreCall) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::BucketExists {
            bucket: bucket.to_string(),
        });
        if let Some(message) = &state.fail_exists {
            return Err(StoreError::service("head_bucket", bucket, message));
        }
        Ok(state.buckets.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::CreateBucket {
            bucket: bucket.to_string(),
            region: region.to_string(),
        });
        if let Some(message) = &state.fail_create {
            return Err(StoreError::service("create_bucket", bucket, message));
        }
        if state.buckets.contains_key(bucket) {
            return Err(StoreError::service(
                "create_bucket",
                bucket,
                "BucketAlreadyOwnedByYou",
            ));
        }
        state.buckets.insert(
            bucket.to_string(),
            MemoryBucket {
                region: region.to_string(),
                objects: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        let body = tokio::fs::read(source)
            .await
            .map_err(|e| StoreError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;

        let mut state = self.state.lock();
        if state.fail_put.contains(key) {
            return Err(StoreError::service("put_object", key, "injected failure"));
        }
        let target = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::service("put_object", key, "NoSuchBucket"))?;
        target.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::ListKeys {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        });
        if state.fail_list.contains(prefix) {
            return Err(StoreError::service("list_objects_v2", prefix, "injected failure"));
        }
        let target = state
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::service("list_objects_v2", prefix, "NoSuchBucket"))?;
        Ok(target
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_put_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("layer.zip");
        std::fs::write(&file, b"deps").unwrap();

        let store = InMemoryObjectStore::new();
        assert!(!store.bucket_exists("b").await.unwrap());
        store.create_bucket("b", "eu-west-2").await.unwrap();
        store
            .put_object("b", "layers/layer.zip", &file, "application/zip")
            .await
            .unwrap();

        assert_eq!(store.bucket_region("b").as_deref(), Some("eu-west-2"));
        assert_eq!(store.list_keys("b", "layers/").await.unwrap(), vec!["layers/layer.zip"]);
        assert!(store.list_keys("b", "lambda/").await.unwrap().is_empty());
        let object = store.object("b", "layers/layer.zip").unwrap();
        assert_eq!(object.body, b"deps");
        assert_eq!(object.content_type, "application/zip");
        assert_eq!(store.calls().len(), 5);
    }

    #[tokio::test]
    async fn duplicate_creation_is_rejected() {
        let store = InMemoryObjectStore::new().with_bucket("b", "us-east-1");
        let err = store.create_bucket("b", "us-east-1").await.unwrap_err();
        assert!(err.to_string().contains("BucketAlreadyOwnedByYou"));
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.zip");
        std::fs::write(&file, b"a").unwrap();

        let store = InMemoryObjectStore::new()
            .with_bucket("b", "us-east-1")
            .fail_put("lambda/a.zip")
            .fail_list("lambda/");
        assert!(store
            .put_object("b", "lambda/a.zip", &file, "application/zip")
            .await
            .is_err());
        assert!(store.list_keys("b", "lambda/").await.is_err());
        assert!(store.keys("b").is_empty());
    }

    #[tokio::test]
    async fn unreadable_source_is_read_error() {
        let store = InMemoryObjectStore::new().with_bucket("b", "us-east-1");
        let err = store
            .put_object("b", "k", Path::new("/definitely/missing.zip"), "application/zip")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}
