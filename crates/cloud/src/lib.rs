//! Object storage provider: put-object by key, public URL by key.
//!
//! Production uses S3 ([`S3Storage`]); tests use [`InMemoryStorage`]. The
//! provider is built once at startup and injected -- consumers never touch
//! AWS types directly.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::primitives::ByteStream;
use tokio::sync::Mutex;

use drawstory_core::storage::object_url;

/// Errors from the object storage provider.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object upload failed: {0}")]
    Upload(String),
}

/// Put-object storage contract consumed by upload and analytics handlers.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`, overwriting any previous object.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public HTTPS URL for an object key.
    fn url_for(&self, key: &str) -> String;
}

/// S3-backed object storage.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3Storage {
    /// Build an S3 client from the ambient AWS environment (credentials
    /// chain, endpoint overrides) pinned to the configured region.
    pub async fn new(bucket: String, region: String) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&config);
        Self {
            client,
            bucket,
            region,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        tracing::debug!(key, bucket = %self.bucket, "Uploaded object");
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }
}

/// In-memory object storage for tests. Records every put.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored object (bytes, content type) for assertions.
    pub async fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().await.get(key).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        object_url("test-bucket", "test-region", key)
    }
}
