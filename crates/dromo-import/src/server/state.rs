//! Application state for the import relay

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ImportConfig;
use crate::error::Result;
use crate::processing::{Importer, ResultExporter, WebhookHandler};
use crate::providers::{DromoClient, ImportProvider, ObjectStore, S3ObjectStore};
use crate::store::StatusStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ImportConfig,
    /// Import records
    store: Arc<StatusStore>,
    /// Starts provider imports
    importer: Importer,
    /// Applies provider callbacks
    webhooks: WebhookHandler,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with Dromo, S3 and the configured store
    pub async fn new(config: ImportConfig) -> Result<Self> {
        tracing::info!("Initializing import relay state...");

        if config.dromo.license_key.is_none() {
            tracing::warn!("DROMO_LICENSE_KEY environment variable not set");
        }
        if config.dromo.schema_id.is_none() {
            tracing::warn!("DROMO_SCHEMA_ID environment variable not set");
        }

        let provider: Arc<dyn ImportProvider> = Arc::new(DromoClient::new(&config.dromo)?);
        tracing::info!(
            "Dromo client initialized ({}, timeout {}s)",
            config.dromo.api_base,
            config.dromo.timeout_secs
        );

        let object_store: Option<Arc<dyn ObjectStore>> = if config.s3.is_configured() {
            let s3 = S3ObjectStore::new(&config.s3).await?;
            tracing::info!("S3 object store initialized (bucket: {})", s3.bucket());
            Some(Arc::new(s3))
        } else {
            tracing::warn!("AWS credentials or S3 bucket not configured");
            None
        };

        let store = Arc::new(match &config.store.persist_path {
            Some(path) => StatusStore::persistent(path),
            None => StatusStore::in_memory(),
        });

        Ok(Self::with_parts(config, provider, object_store, store))
    }

    /// Assemble state from already-built parts
    pub fn with_parts(
        config: ImportConfig,
        provider: Arc<dyn ImportProvider>,
        object_store: Option<Arc<dyn ObjectStore>>,
        store: Arc<StatusStore>,
    ) -> Self {
        let exporter = match (&object_store, config.export.enabled) {
            (Some(objects), true) => Some(Arc::new(ResultExporter::new(
                Arc::clone(&provider),
                Arc::clone(objects),
                Arc::clone(&store),
                config.export.prefix.clone(),
            ))),
            _ => None,
        };
        tracing::info!("Processed data export enabled: {}", exporter.is_some());

        let importer = Importer::new(provider, object_store, Arc::clone(&store));
        let webhooks = WebhookHandler::new(Arc::clone(&store), exporter);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                importer,
                webhooks,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ImportConfig {
        &self.inner.config
    }

    /// Get the status store
    pub fn store(&self) -> &Arc<StatusStore> {
        &self.inner.store
    }

    pub fn importer(&self) -> &Importer {
        &self.inner.importer
    }

    pub fn webhooks(&self) -> &WebhookHandler {
        &self.inner.webhooks
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
