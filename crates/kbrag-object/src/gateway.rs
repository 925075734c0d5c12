//! Object store gateway (C1, spec §4.1).
//!
//! Wraps a single OpenDAL [`Operator`] behind the domain-shaped operations
//! the rest of the core depends on. Grounded on
//! `nvisy-opendal::backend::StorageBackend`.

use std::time::Duration;

use bytes::Bytes;
use opendal::Operator;

use crate::TRACING_TARGET;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// Gateway over a blob store, addressed by fully domain-shaped keys
/// (spec §6 "Object layout").
#[derive(Clone)]
pub struct ObjectStoreGateway {
    operator: Operator,
}

impl ObjectStoreGateway {
    /// Builds a gateway from configuration.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let operator = config.build_operator()?;
        tracing::info!(target: TRACING_TARGET, backend = %config.backend_name(), "object store gateway initialized");
        Ok(Self { operator })
    }

    /// Builds a gateway directly from a pre-constructed operator (used by
    /// tests, which run against an in-memory or filesystem backend).
    pub fn from_operator(operator: Operator) -> Self {
        Self { operator }
    }

    #[tracing::instrument(skip(self, bytes), fields(key = %key, size = bytes.len()))]
    pub async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.operator
            .write_with(key, bytes)
            .content_type(content_type)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Writes only if the key does not already exist, surfacing `Conflict`
    /// otherwise (used by the coordinator's precondition-protected writes,
    /// spec §4.1).
    #[tracing::instrument(skip(self, bytes), fields(key = %key, size = bytes.len()))]
    pub async fn put_object_if_absent(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.operator.exists(key).await.map_err(StorageError::from)? {
            return Err(StorageError::Conflict(format!("{key} already exists")));
        }
        self.put_object(key, bytes, content_type).await
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        match self.operator.read(key).await {
            Ok(buf) => Ok(buf.to_bytes()),
            Err(err) => {
                let classified = StorageError::from(err);
                if classified.is_transient() {
                    tracing::warn!(target: TRACING_TARGET, key = %key, "transient read failure, retrying once");
                    self.operator
                        .read(key)
                        .await
                        .map(|buf| buf.to_bytes())
                        .map_err(StorageError::from)
                } else {
                    Err(classified)
                }
            }
        }
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.operator.delete(key).await.map_err(StorageError::from)?;
        Ok(())
    }

    /// Recursively deletes every object under `prefix`. Used by KB and
    /// document deletion (spec §4.10).
    #[tracing::instrument(skip(self), fields(prefix = %prefix))]
    pub async fn delete_prefix(&self, prefix: &str) -> StorageResult<()> {
        self.operator
            .remove_all(prefix)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.operator.exists(key).await.map_err(StorageError::from)
    }

    /// Generates a presigned write URL for direct client upload
    /// (C10 `presignUpload`).
    #[tracing::instrument(skip(self), fields(key = %key, ttl_secs = ttl.as_secs()))]
    pub async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> StorageResult<String> {
        let presigned = self
            .operator
            .presign_write(key, ttl)
            .await
            .map_err(StorageError::from)?;
        Ok(presigned.uri().to_string())
    }
}

impl std::fmt::Debug for ObjectStoreGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreGateway").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::services::Memory;

    fn memory_gateway() -> ObjectStoreGateway {
        let operator = Operator::new(Memory::default()).unwrap().finish();
        ObjectStoreGateway::from_operator(operator)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let gw = memory_gateway();
        gw.put_object("a/b.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();
        let got = gw.get_object("a/b.txt").await.unwrap();
        assert_eq!(&got[..], b"hello");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let gw = memory_gateway();
        let err = gw.get_object("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn put_if_absent_conflicts_on_existing_key() {
        let gw = memory_gateway();
        gw.put_object("k", Bytes::from_static(b"1"), "text/plain")
            .await
            .unwrap();
        let err = gw
            .put_object_if_absent("k", Bytes::from_static(b"2"), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_prefix_removes_all_nested_keys() {
        let gw = memory_gateway();
        gw.put_object("docs/a/1", Bytes::from_static(b"1"), "text/plain")
            .await
            .unwrap();
        gw.put_object("docs/a/2", Bytes::from_static(b"2"), "text/plain")
            .await
            .unwrap();
        gw.delete_prefix("docs/a/").await.unwrap();
        assert!(!gw.exists("docs/a/1").await.unwrap());
        assert!(!gw.exists("docs/a/2").await.unwrap());
    }
}
