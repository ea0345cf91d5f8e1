//! Import record types for tracking provider import status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Status of a headless import, as reported by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    /// Import created, file uploaded, waiting for the provider
    Pending,
    /// Provider is working on the file
    Processing,
    /// Provider finished successfully
    Completed,
    /// Provider reported a failure
    Failed,
}

impl ImportStatus {
    /// Whether the provider will send no further updates for this import
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "PENDING",
            ImportStatus::Processing => "PROCESSING",
            ImportStatus::Completed => "COMPLETED",
            ImportStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportStatus {
    type Err = Error;

    /// Parse a provider status string, accepting the aliases Dromo uses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PENDING" | "CREATED" | "QUEUED" => Ok(ImportStatus::Pending),
            "PROCESSING" | "RUNNING" | "IN_PROGRESS" | "STARTED" | "UPLOADED" => {
                Ok(ImportStatus::Processing)
            }
            "COMPLETED" | "COMPLETE" | "SUCCESSFUL" | "SUCCESS" => Ok(ImportStatus::Completed),
            "FAILED" | "FAILURE" | "ERROR" => Ok(ImportStatus::Failed),
            other => Err(Error::validation(format!("Unknown import status: {}", other))),
        }
    }
}

/// Local record of a provider import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportRecord {
    /// Provider-assigned import id
    pub import_id: String,
    /// Current status
    pub status: ImportStatus,
    /// Original filename supplied by the caller
    pub filename: String,
    /// Source object key
    pub s3_key: String,
    /// Human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Object key of the exported processed data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last changed
    pub updated_at: DateTime<Utc>,
}

impl ImportRecord {
    /// Create a freshly started import
    pub fn pending(
        import_id: impl Into<String>,
        filename: impl Into<String>,
        s3_key: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            import_id: import_id.into(),
            status: ImportStatus::Pending,
            filename: filename.into(),
            s3_key: s3_key.into(),
            message: Some("Import started successfully".to_string()),
            error: None,
            output_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a placeholder for an import first seen through a webhook
    pub fn from_webhook(import_id: impl Into<String>, status: ImportStatus) -> Self {
        let now = Utc::now();
        Self {
            import_id: import_id.into(),
            status,
            filename: String::new(),
            s3_key: String::new(),
            message: None,
            error: None,
            output_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Body of `POST /import-file`
///
/// Fields are optional so that a missing field is reported as a validation
/// error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartImportRequest {
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl StartImportRequest {
    /// Check both fields are present and non-blank, returning `(s3_key, filename)`
    ///
    /// Values are returned as sent; object keys may legally contain spaces.
    pub fn validate(self) -> Result<(String, String), Error> {
        let s3_key = require_field(self.s3_key, "s3_key")?;
        let filename = require_field(self.filename, "filename")?;
        Ok((s3_key, filename))
    }
}

fn require_field(value: Option<String>, name: &str) -> Result<String, Error> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(Error::validation(format!("{} must not be empty", name))),
        None => Err(Error::validation(format!("{} is required", name))),
    }
}

/// Response of `POST /import-file`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartImportResponse {
    pub import_id: String,
    pub status: ImportStatus,
    pub message: String,
}

impl From<&ImportRecord> for StartImportResponse {
    fn from(record: &ImportRecord) -> Self {
        Self {
            import_id: record.import_id.clone(),
            status: record.status,
            message: record
                .message
                .clone()
                .unwrap_or_else(|| "Import started successfully".to_string()),
        }
    }
}
