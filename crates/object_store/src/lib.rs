//! Object-store access for cached forecast payloads.
//!
//! Defines the `ObjectStore` seam plus the production S3 implementation and
//! an in-memory implementation for tests.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// Errors from object-store operations.
///
/// `NotFound` stays distinguishable so callers can treat an absent object as
/// a cache miss instead of an infrastructure failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("object store backend error: {0}")]
    Backend(String),
}

/// A stored object: payload bytes plus the store's last-modified timestamp.
///
/// `last_modified` is absent when the backend does not report one.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Key/value blob store with get-by-key and overwriting put-by-key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `key`.
    async fn get(&self, key: &str) -> Result<StoredObject, StoreError>;

    /// Write `bytes` at `key`, overwriting any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}
