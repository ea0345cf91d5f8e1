//! Import provider trait for starting headless imports

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A headless import created on the provider side, awaiting its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedImport {
    /// Provider-assigned import id
    pub import_id: String,
    /// Presigned URL the file content is PUT to
    pub upload_url: String,
}

/// Trait for the external import provider
///
/// Implementations:
/// - `DromoClient`: Dromo headless import API
#[async_trait]
pub trait ImportProvider: Send + Sync {
    /// Fail with a configuration error when the provider cannot be called
    ///
    /// Checked before any network traffic for an import.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    /// Create a headless import for a file with the given original name
    async fn create_import(&self, filename: &str) -> Result<CreatedImport>;

    /// Upload the file content to the URL returned by `create_import`
    async fn upload_file(&self, upload_url: &str, data: Bytes) -> Result<()>;

    /// Download the processed output of a completed import
    async fn fetch_processed_data(&self, import_id: &str) -> Result<Bytes>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
