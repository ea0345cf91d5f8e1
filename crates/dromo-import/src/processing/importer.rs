//! Starts headless imports from stored files

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{ImportProvider, ObjectStore};
use crate::store::StatusStore;
use crate::types::ImportRecord;

/// Relays a stored file to the import provider and registers the import
pub struct Importer {
    provider: Arc<dyn ImportProvider>,
    object_store: Option<Arc<dyn ObjectStore>>,
    store: Arc<StatusStore>,
}

impl Importer {
    pub fn new(
        provider: Arc<dyn ImportProvider>,
        object_store: Option<Arc<dyn ObjectStore>>,
        store: Arc<StatusStore>,
    ) -> Self {
        Self {
            provider,
            object_store,
            store,
        }
    }

    /// Start an import for `s3_key`, returning the PENDING record
    ///
    /// Arguments are expected to be validated already. Nothing is recorded
    /// unless every provider call succeeds.
    pub async fn start_import(&self, s3_key: &str, filename: &str) -> Result<ImportRecord> {
        self.provider.ensure_configured()?;
        let object_store = self.object_store.as_ref().ok_or_else(|| {
            Error::Config("AWS credentials or S3 bucket not configured".to_string())
        })?;

        let data = object_store.get_object(s3_key).await?;
        tracing::info!(
            "Read {} ({} bytes) from {}",
            s3_key,
            data.len(),
            object_store.name()
        );

        let created = self.provider.create_import(filename).await?;
        tracing::info!(
            "Created {} import {} for {}",
            self.provider.name(),
            created.import_id,
            filename
        );

        self.provider.upload_file(&created.upload_url, data).await?;

        let record = ImportRecord::pending(&created.import_id, filename, s3_key);
        self.store.insert(record.clone());

        tracing::info!("Started import {} for file {}", record.import_id, s3_key);
        Ok(record)
    }
}
