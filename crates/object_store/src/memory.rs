//! In-memory object store.
//!
//! Used by tests that need to stage cache entries of a chosen age.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{ObjectStore, StoreError, StoredObject};

/// Object store held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object with an explicit last-modified timestamp.
    pub fn insert_with_modified(
        &self,
        key: &str,
        bytes: Vec<u8>,
        last_modified: Option<DateTime<Utc>>,
    ) {
        let mut objects = self.objects.write().expect("memory store lock poisoned");
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                last_modified,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("memory store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<StoredObject, StoreError> {
        let objects = self.objects.read().expect("memory store lock poisoned");
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.insert_with_modified(key, bytes, Some(Utc::now()));
        Ok(())
    }
}
