//! Configuration for the import relay

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Dromo API configuration
    #[serde(default)]
    pub dromo: DromoConfig,
    /// S3 configuration
    #[serde(default)]
    pub s3: S3Config,
    /// Status store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Processed-data export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

impl ImportConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Overlay values from an environment lookup
    ///
    /// Blank values are ignored. Unparseable numbers and booleans are logged
    /// and leave the current value in place.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", v),
            }
        }

        if let Some(v) = get("DROMO_API_BASE") {
            self.dromo.api_base = v;
        }
        if let Some(v) = get("DROMO_LICENSE_KEY") {
            self.dromo.license_key = Some(v);
        }
        if let Some(v) = get("DROMO_SCHEMA_ID") {
            self.dromo.schema_id = Some(v);
        }
        if let Some(v) = get("DROMO_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.dromo.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid DROMO_TIMEOUT_SECS value: {}", v),
            }
        }

        if let Some(v) = get("AWS_S3_BUCKET") {
            self.s3.bucket = Some(v);
        }
        if let Some(v) = get("AWS_REGION") {
            self.s3.region = v;
        }
        if let Some(v) = get("AWS_ACCESS_KEY") {
            self.s3.access_key = Some(v);
        }
        if let Some(v) = get("AWS_SECRET_KEY") {
            self.s3.secret_key = Some(v);
        }
        if let Some(v) = get("AWS_ENDPOINT_URL") {
            self.s3.endpoint_url = Some(v);
        }

        if let Some(v) = get("IMPORT_STORE_PATH") {
            self.store.persist_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("EXPORT_ENABLED") {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.export.enabled = true,
                "0" | "false" | "no" | "off" => self.export.enabled = false,
                _ => tracing::warn!("Ignoring invalid EXPORT_ENABLED value: {}", v),
            }
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("server.port must not be 0".to_string()));
        }
        if self.dromo.api_base.trim().is_empty() {
            return Err(Error::Config("dromo.api_base must not be empty".to_string()));
        }
        if self.dromo.timeout_secs == 0 {
            return Err(Error::Config("dromo.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Dromo headless API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DromoConfig {
    /// API base URL
    pub api_base: String,
    /// License key sent as `X-Dromo-License-Key`
    #[serde(default)]
    pub license_key: Option<String>,
    /// Schema the imported file is validated against
    #[serde(default)]
    pub schema_id: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DromoConfig {
    fn default() -> Self {
        Self {
            api_base: "https://app.dromo.io/api/v1".to_string(),
            license_key: None,
            schema_id: None,
            timeout_secs: 30,
        }
    }
}

/// S3 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket holding source files and processed output
    #[serde(default)]
    pub bucket: Option<String>,
    /// AWS region
    pub region: String,
    /// Access key id (falls back to the default AWS chain when unset)
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret access key
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Custom endpoint for S3-compatible storage (MinIO)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: None,
            region: "us-east-1".to_string(),
            access_key: None,
            secret_key: None,
            endpoint_url: None,
        }
    }
}

impl S3Config {
    pub fn is_configured(&self) -> bool {
        self.bucket.is_some()
    }
}

/// Status store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file the store is persisted to (in-memory only when unset)
    #[serde(default)]
    pub persist_path: Option<PathBuf>,
}

/// Export of processed data after a successful import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Download processed data when a COMPLETED webhook arrives
    pub enabled: bool,
    /// Key prefix for exported files
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "processed/".to_string(),
        }
    }
}
