//! Provider abstractions for the import provider and object storage
//!
//! Trait-based so the relay can run against Dromo and S3 in production and
//! against in-process fakes in tests.

pub mod import_provider;
pub mod object_store;
pub mod dromo;
pub mod s3;
pub mod local;

pub use import_provider::{CreatedImport, ImportProvider};
pub use object_store::ObjectStore;
pub use dromo::DromoClient;
pub use s3::S3ObjectStore;
pub use local::MemoryObjectStore;
