//! Webhook payload parsing
//!
//! Dromo wraps its callbacks in an envelope (`{"data": {"id", "status", "errors"}}`)
//! while internal callers post a flat `{"import_id", "status"}` body. Both are
//! accepted; flat fields take precedence when both are present.

use serde::Serialize;
use serde_json::Value;

use super::import::ImportStatus;
use crate::error::{Error, Result};

/// Normalized webhook update
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookUpdate {
    pub import_id: String,
    pub status: ImportStatus,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl WebhookUpdate {
    /// Extract an update from a raw webhook body
    pub fn from_payload(payload: &Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(Error::validation("Webhook payload must be a JSON object"));
        }
        let data = payload.get("data").filter(|d| d.is_object());

        let import_id = string_field(payload, "import_id")
            .or_else(|| data.and_then(|d| string_field(d, "id")))
            .or_else(|| data.and_then(|d| string_field(d, "import_id")))
            .ok_or_else(|| Error::validation("Missing import_id in webhook payload"))?;

        let raw_status = string_field(payload, "status")
            .or_else(|| data.and_then(|d| string_field(d, "status")))
            .ok_or_else(|| Error::validation("Missing status in webhook payload"))?;
        let status: ImportStatus = raw_status.parse()?;

        let message = string_field(payload, "message")
            .or_else(|| data.and_then(|d| string_field(d, "message")));

        let errors = payload
            .get("errors")
            .or_else(|| data.and_then(|d| d.get("errors")))
            .and_then(describe_errors);

        let error = match status {
            ImportStatus::Failed => errors.or_else(|| Some("Import failed".to_string())),
            _ => None,
        };

        Ok(Self {
            import_id,
            status,
            message,
            error,
        })
    }
}

/// Non-empty string field, with numeric ids stringified
fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn describe_errors(errors: &Value) -> Option<String> {
    match errors {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

/// Acknowledgement returned to the webhook caller
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub message: String,
    pub import_id: String,
    pub status: ImportStatus,
}

impl From<&WebhookUpdate> for WebhookAck {
    fn from(update: &WebhookUpdate) -> Self {
        Self {
            message: "Webhook processed successfully".to_string(),
            import_id: update.import_id.clone(),
            status: update.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_payload() {
        let update = WebhookUpdate::from_payload(&json!({
            "import_id": "imp_1",
            "status": "PROCESSING",
            "message": "halfway"
        }))
        .unwrap();

        assert_eq!(update.import_id, "imp_1");
        assert_eq!(update.status, ImportStatus::Processing);
        assert_eq!(update.message.as_deref(), Some("halfway"));
        assert!(update.error.is_none());
    }

    #[test]
    fn test_envelope_payload() {
        let update = WebhookUpdate::from_payload(&json!({
            "data": { "id": "imp_2", "status": "SUCCESSFUL" }
        }))
        .unwrap();

        assert_eq!(update.import_id, "imp_2");
        assert_eq!(update.status, ImportStatus::Completed);
    }

    #[test]
    fn test_failed_collects_errors() {
        let update = WebhookUpdate::from_payload(&json!({
            "data": {
                "id": "imp_3",
                "status": "FAILED",
                "errors": ["bad header", {"row": 4}]
            }
        }))
        .unwrap();

        assert_eq!(update.error.as_deref(), Some("bad header; {\"row\":4}"));
    }

    #[test]
    fn test_flat_fields_take_precedence() {
        let update = WebhookUpdate::from_payload(&json!({
            "import_id": "outer",
            "status": "FAILED",
            "data": { "id": "inner", "status": "SUCCESSFUL" }
        }))
        .unwrap();

        assert_eq!(update.import_id, "outer");
        assert_eq!(update.status, ImportStatus::Failed);
        assert_eq!(update.error.as_deref(), Some("Import failed"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(WebhookUpdate::from_payload(&json!({ "status": "FAILED" })).is_err());
        assert!(WebhookUpdate::from_payload(&json!({ "import_id": "x" })).is_err());
        assert!(WebhookUpdate::from_payload(&json!({ "import_id": "", "status": "FAILED" })).is_err());
        assert!(WebhookUpdate::from_payload(&json!(["import_id"])).is_err());
        assert!(WebhookUpdate::from_payload(&json!({ "import_id": "x", "status": "LOST" })).is_err());
    }
}
