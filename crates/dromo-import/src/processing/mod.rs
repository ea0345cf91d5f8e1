//! Import start, webhook handling and processed-data export

mod exporter;
mod importer;
mod webhook;

pub use exporter::ResultExporter;
pub use importer::Importer;
pub use webhook::{WebhookHandler, WebhookOutcome};
