//! Copies processed provider output back to the object store

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{ImportProvider, ObjectStore};
use crate::store::StatusStore;

/// Downloads processed data for completed imports and stores it
pub struct ResultExporter {
    provider: Arc<dyn ImportProvider>,
    object_store: Arc<dyn ObjectStore>,
    store: Arc<StatusStore>,
    prefix: String,
}

impl ResultExporter {
    pub fn new(
        provider: Arc<dyn ImportProvider>,
        object_store: Arc<dyn ObjectStore>,
        store: Arc<StatusStore>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            object_store,
            store,
            prefix: prefix.into(),
        }
    }

    /// Object key processed data for an import is written to
    pub fn output_key(&self, import_id: &str) -> String {
        format!("{}{}.csv", self.prefix, import_id)
    }

    /// Export the processed data of one import, returning the object key
    pub async fn export(&self, import_id: &str) -> Result<String> {
        let data = self.provider.fetch_processed_data(import_id).await?;
        let output_key = self.output_key(import_id);

        self.object_store
            .put_object(&output_key, data, "text/csv")
            .await?;
        self.store.set_output_key(import_id, &output_key);

        tracing::info!(
            "Exported processed data for import {} to {}",
            import_id,
            output_key
        );
        Ok(output_key)
    }

    /// Run `export` in the background; failures are logged and noted on the record
    pub fn spawn_export(self: &Arc<Self>, import_id: String) -> tokio::task::JoinHandle<()> {
        let exporter = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = exporter.export(&import_id).await {
                tracing::error!(
                    "Failed to export processed data for import {}: {}",
                    import_id,
                    e
                );
                exporter
                    .store
                    .set_message(&import_id, format!("Processed data export failed: {}", e));
            }
        })
    }
}
