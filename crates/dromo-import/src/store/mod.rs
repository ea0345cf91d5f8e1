//! Import status storage

pub mod status_store;

pub use status_store::StatusStore;
