//! dromo-import: HTTP relay for Dromo headless imports
//!
//! Starts provider imports for files stored in S3, records the provider's
//! webhook callbacks, and serves the resulting import status.

pub mod config;
pub mod error;
pub mod processing;
pub mod providers;
pub mod server;
pub mod store;
pub mod types;

pub use config::ImportConfig;
pub use error::{Error, Result};
pub use server::{build_router, state::AppState, ImportServer};
pub use store::StatusStore;
pub use types::{ImportRecord, ImportStatus};
