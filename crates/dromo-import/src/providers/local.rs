//! In-process object store

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::object_store::ObjectStore;
use crate::error::{Error, Result};

/// Object store kept in memory, keyed by object key
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, (Bytes, String)>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.objects
            .insert(key.into(), (data.into(), "application/octet-stream".to_string()));
    }

    /// Content and content type of a stored object
    pub fn object(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.get(key).map(|o| o.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, key: &str) -> Result<Bytes> {
        self.objects
            .get(key)
            .map(|o| o.0.clone())
            .ok_or_else(|| Error::storage(format!("Object not found: {}", key)))
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        self.objects
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(format!("memory://{}", key))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
