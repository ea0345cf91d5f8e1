//! Core types for the import relay

pub mod import;
pub mod webhook;

pub use import::{ImportRecord, ImportStatus, StartImportRequest, StartImportResponse};
pub use webhook::{WebhookAck, WebhookUpdate};
