//! # fisc-store
//!
//! Object-store backed persistence for computation-tree records.
//!
//! Records are JSON blobs keyed by their uuid under a configurable prefix. Backends:
//! - `InMemory` for tests
//! - `LocalFileSystem` for development
//! - S3-compatible buckets in production (via `storage` config)
//!
//! The codec contract is a pure round-trip: `get_tree(put_tree(tree)) == tree`,
//! including empty trees and empty entity descriptions. An absent key surfaces as
//! [`StoreError::NotFound`], distinct from decode failures and generic store faults.

pub mod error;

pub use error::StoreError;

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{ObjectStore, PutPayload, path::Path};
use uuid::Uuid;

use fisc_config::StorageConfig;
use fisc_trace::ComputationTree;

/// Tree-record store over any [`ObjectStore`] backend.
pub struct TreeStore {
    store: Arc<dyn ObjectStore>,
    prefix: Path,
}

impl TreeStore {
    /// Store over an explicit backend and key prefix.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str) -> Self {
        Self {
            store,
            prefix: Path::from(prefix),
        }
    }

    /// In-memory store (for testing).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "trees")
    }

    /// Local filesystem store rooted at `dir` (created if absent).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created and
    /// [`StoreError::ObjectStore`] if the backend rejects it.
    pub fn local(dir: &std::path::Path, prefix: &str) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let backend = LocalFileSystem::new_with_prefix(dir)?;
        Ok(Self::new(Arc::new(backend), prefix))
    }

    /// Build a store from configuration: S3 when credentials are configured, the
    /// local directory backend when `local_dir` is set, in-memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ObjectStore`] when the S3 builder rejects the
    /// configuration and [`StoreError::Io`] on local-directory setup failure.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        if config.is_s3_configured() {
            let mut builder = AmazonS3Builder::new()
                .with_bucket_name(&config.bucket)
                .with_region(&config.region)
                .with_access_key_id(&config.access_key_id)
                .with_secret_access_key(&config.secret_access_key);
            if !config.endpoint.is_empty() {
                builder = builder.with_endpoint(&config.endpoint);
            }
            let backend = builder.build()?;
            return Ok(Self::new(Arc::new(backend), &config.prefix));
        }

        if !config.local_dir.is_empty() {
            return Self::local(std::path::Path::new(&config.local_dir), &config.prefix);
        }

        tracing::warn!("no storage backend configured; using in-memory store");
        Ok(Self::new(Arc::new(InMemory::new()), &config.prefix))
    }

    /// Access the underlying object store. Exposed for tests that need to plant
    /// raw payloads; prefer the typed methods for standard operations.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    fn key(&self, uuid: Uuid) -> Path {
        self.prefix.child(format!("{uuid}.json"))
    }

    /// Persist a captured tree under its uuid and return the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Deserialize`] if encoding fails and
    /// [`StoreError::ObjectStore`] on write failure.
    pub async fn put_tree(&self, tree: &ComputationTree) -> Result<Uuid, StoreError> {
        let key = self.key(tree.uuid);
        let payload = serde_json::to_vec(tree)?;
        tracing::debug!(uuid = %tree.uuid, bytes = payload.len(), "storing computation tree");
        self.store.put(&key, PutPayload::from(payload)).await?;
        Ok(tree.uuid)
    }

    /// Fetch a stored tree by uuid.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record exists under the id,
    /// [`StoreError::Deserialize`] when the payload cannot be decoded, and
    /// [`StoreError::ObjectStore`] for any other storage fault.
    pub async fn get_tree(&self, uuid: Uuid) -> Result<ComputationTree, StoreError> {
        let key = self.key(uuid);
        let result = self.store.get(&key).await.map_err(|error| match error {
            object_store::Error::NotFound { .. } => StoreError::NotFound { uuid },
            other => StoreError::ObjectStore(other),
        })?;
        let bytes = result.bytes().await?;
        let tree = serde_json::from_slice(&bytes)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fisc_core::{CountryId, EntityDescription};
    use pretty_assertions::assert_eq;

    fn sample_tree() -> ComputationTree {
        ComputationTree::capture(
            CountryId::Us,
            vec![
                "household_net_income <60000>".to_string(),
                "  employment_income <29000 31000>".to_string(),
            ],
            EntityDescription::from([("people", vec!["you", "your partner"])]),
        )
    }

    #[tokio::test]
    async fn round_trip() {
        let store = TreeStore::in_memory();
        let tree = sample_tree();
        let uuid = store.put_tree(&tree).await.unwrap();
        assert_eq!(uuid, tree.uuid);
        let fetched = store.get_tree(uuid).await.unwrap();
        assert_eq!(fetched, tree);
    }

    #[tokio::test]
    async fn round_trip_empty_tree_and_description() {
        let store = TreeStore::in_memory();
        let tree = ComputationTree::capture(CountryId::Il, vec![], EntityDescription::default());
        store.put_tree(&tree).await.unwrap();
        let fetched = store.get_tree(tree.uuid).await.unwrap();
        assert_eq!(fetched, tree);
    }

    #[tokio::test]
    async fn absent_key_is_not_found() {
        let store = TreeStore::in_memory();
        let uuid = Uuid::new_v4();
        let err = store.get_tree(uuid).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { uuid: u } if u == uuid));
        assert_eq!(err.to_string(), format!("Unable to find record with UUID {uuid}"));
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_deserialize_error() {
        let store = TreeStore::in_memory();
        let uuid = Uuid::new_v4();
        let key = store.key(uuid);
        store
            .backend()
            .put(&key, PutPayload::from_static(b"not json"))
            .await
            .unwrap();
        let err = store.get_tree(uuid).await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialize(_)));
    }

    #[tokio::test]
    async fn local_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TreeStore::local(dir.path(), "trees").unwrap();
        let tree = sample_tree();
        store.put_tree(&tree).await.unwrap();
        let fetched = store.get_tree(tree.uuid).await.unwrap();
        assert_eq!(fetched, tree);
    }

    #[tokio::test]
    async fn records_never_overwrite_each_other() {
        let store = TreeStore::in_memory();
        let a = sample_tree();
        let b = sample_tree();
        store.put_tree(&a).await.unwrap();
        store.put_tree(&b).await.unwrap();
        assert_eq!(store.get_tree(a.uuid).await.unwrap(), a);
        assert_eq!(store.get_tree(b.uuid).await.unwrap(), b);
    }
}
