//! Applies provider webhook callbacks to the status store

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::exporter::ResultExporter;
use crate::error::Result;
use crate::store::StatusStore;
use crate::types::{ImportRecord, ImportStatus, WebhookAck, WebhookUpdate};

/// Outcome of one webhook delivery
pub struct WebhookOutcome {
    pub ack: WebhookAck,
    pub record: ImportRecord,
    /// Background export started for a completed import
    pub export: Option<JoinHandle<()>>,
}

/// Validates webhook payloads and records the reported status
pub struct WebhookHandler {
    store: Arc<StatusStore>,
    exporter: Option<Arc<ResultExporter>>,
}

impl WebhookHandler {
    pub fn new(store: Arc<StatusStore>, exporter: Option<Arc<ResultExporter>>) -> Self {
        Self { store, exporter }
    }

    /// Handle one delivery
    ///
    /// A structurally invalid payload is rejected before the store is touched.
    pub fn handle(&self, payload: &Value) -> Result<WebhookOutcome> {
        let update = WebhookUpdate::from_payload(payload)?;
        let record = self.store.apply_update(&update);

        match update.status {
            ImportStatus::Completed => {
                tracing::info!("Import {} completed successfully", update.import_id)
            }
            ImportStatus::Failed => tracing::error!(
                "Import {} failed: {}",
                update.import_id,
                update.error.as_deref().unwrap_or("no details")
            ),
            status => tracing::info!("Import {} is now {}", update.import_id, status),
        }

        // A re-delivered completion keeps the export already written
        let export = match (&self.exporter, update.status) {
            (Some(exporter), ImportStatus::Completed) if record.output_key.is_none() => {
                Some(exporter.spawn_export(update.import_id.clone()))
            }
            (Some(_), ImportStatus::Completed) => {
                tracing::debug!("Import {} already exported, skipping", update.import_id);
                None
            }
            _ => None,
        };

        Ok(WebhookOutcome {
            ack: WebhookAck::from(&update),
            record,
            export,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[tokio::test]
    async fn test_invalid_payload_leaves_store_untouched() {
        let store = Arc::new(StatusStore::in_memory());
        let handler = WebhookHandler::new(Arc::clone(&store), None);

        let result = handler.handle(&json!({ "status": "COMPLETED" }));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_completed_without_exporter() {
        let store = Arc::new(StatusStore::in_memory());
        store.insert(ImportRecord::pending("imp_1", "a.csv", "uploads/a.csv"));
        let handler = WebhookHandler::new(Arc::clone(&store), None);

        let outcome = handler
            .handle(&json!({ "data": { "id": "imp_1", "status": "SUCCESSFUL" } }))
            .unwrap();

        assert!(outcome.export.is_none());
        assert_eq!(outcome.ack.status, ImportStatus::Completed);
        assert_eq!(outcome.record.filename, "a.csv");
        assert_eq!(store.get("imp_1").unwrap().status, ImportStatus::Completed);
    }
}
