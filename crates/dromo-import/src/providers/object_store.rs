//! Object store trait for reading source files and writing processed output

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Trait for object storage
///
/// Implementations:
/// - `S3ObjectStore`: AWS S3 or an S3-compatible endpoint
/// - `MemoryObjectStore`: in-process map, for local runs and tests
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object's content
    async fn get_object(&self, key: &str) -> Result<Bytes>;

    /// Write an object, returning its storage URI
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
