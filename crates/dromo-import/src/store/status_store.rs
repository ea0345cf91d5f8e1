//! Process-wide registry of import records
//!
//! Updates for one import id go through the `DashMap` entry API, which holds
//! the shard lock for the whole read-modify-write.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{ImportRecord, WebhookUpdate};

/// Registry of import records keyed by provider import id
pub struct StatusStore {
    records: DashMap<String, ImportRecord>,
    /// JSON file the registry is mirrored to
    persist_path: Option<PathBuf>,
    /// Serializes file writes
    write_lock: Mutex<()>,
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StatusStore {
    /// Create a store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            records: DashMap::new(),
            persist_path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store mirrored to a JSON file, loading any existing records
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = Self::load_records(&path);
        tracing::info!("Loaded {} import records from {}", records.len(), path.display());

        Self {
            records,
            persist_path: Some(path),
            write_lock: Mutex::new(()),
        }
    }

    /// Load records from disk
    fn load_records(path: &Path) -> DashMap<String, ImportRecord> {
        let records = DashMap::new();

        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<ImportRecord>>(&content) {
                    Ok(list) => {
                        for record in list {
                            records.insert(record.import_id.clone(), record);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                }
            }
        }

        records
    }

    /// Save records to disk
    fn save(&self) {
        let Some(path) = &self.persist_path else {
            return;
        };

        let _guard = self.write_lock.lock();
        let records = self.list();

        match serde_json::to_string_pretty(&records) {
            Ok(content) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if let Err(e) = fs::create_dir_all(parent) {
                        tracing::error!("Failed to create {}: {}", parent.display(), e);
                        return;
                    }
                }
                let tmp_path = temp_path(path);
                if let Err(e) = fs::write(&tmp_path, content) {
                    tracing::error!("Failed to save {}: {}", tmp_path.display(), e);
                    return;
                }
                if let Err(e) = fs::rename(&tmp_path, path) {
                    tracing::error!("Failed to replace {}: {}", path.display(), e);
                    let _ = fs::remove_file(&tmp_path);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize import records: {}", e);
            }
        }
    }

    /// Insert or replace a record
    pub fn insert(&self, record: ImportRecord) {
        self.records.insert(record.import_id.clone(), record);
        self.save();
    }

    /// Get a record by import id
    pub fn get(&self, import_id: &str) -> Option<ImportRecord> {
        self.records.get(import_id).map(|r| r.clone())
    }

    /// All records, oldest first
    pub fn list(&self) -> Vec<ImportRecord> {
        let mut records: Vec<ImportRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.import_id.cmp(&b.import_id))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply a webhook update, creating the record if it is unknown
    ///
    /// The status is set exactly to the update's status; no transition rules
    /// are enforced. Returns the resulting record.
    pub fn apply_update(&self, update: &WebhookUpdate) -> ImportRecord {
        let result = match self.records.entry(update.import_id.clone()) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                record.status = update.status;
                if update.message.is_some() {
                    record.message = update.message.clone();
                }
                record.error = update.error.clone();
                record.touch();
                record.clone()
            }
            Entry::Vacant(vacant) => {
                tracing::info!(
                    "Webhook for unknown import {}, creating record",
                    update.import_id
                );
                let mut record = ImportRecord::from_webhook(&update.import_id, update.status);
                record.message = update.message.clone();
                record.error = update.error.clone();
                vacant.insert(record).clone()
            }
        };

        self.save();
        result
    }

    /// Record where the processed data was exported
    pub fn set_output_key(&self, import_id: &str, output_key: &str) -> bool {
        let updated = match self.records.get_mut(import_id) {
            Some(mut record) => {
                record.output_key = Some(output_key.to_string());
                record.touch();
                true
            }
            None => false,
        };
        if updated {
            self.save();
        }
        updated
    }

    /// Replace the human-readable message of a record
    pub fn set_message(&self, import_id: &str, message: impl Into<String>) -> bool {
        let updated = match self.records.get_mut(import_id) {
            Some(mut record) => {
                record.message = Some(message.into());
                record.touch();
                true
            }
            None => false,
        };
        if updated {
            self.save();
        }
        updated
    }
}

/// Sibling file a snapshot is written to before being renamed into place
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
