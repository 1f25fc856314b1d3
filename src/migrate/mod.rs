//! Boot-time configuration migration.
//!
//! Brings the persisted `config.json` up to the schema shape the running
//! firmware expects, using the additive [`diff`] engine and the atomic
//! [`storage`](crate::storage) commit. Runs once at startup, before any
//! network activity, so it needs no locking.
//!
//! The walk is cheap and idempotent: re-running it against an already
//! migrated document is a no-op.

mod diff;

pub use diff::{apply_diff, WILDCARD_KEY};

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde_json::{Map, Value};

use crate::storage::{self, StorageError};

// ── Version gate ──────────────────────────────────────────────

/// Decide whether migration is required at all.
///
/// With no target version the migrator runs unconditionally every boot.
/// Otherwise the stored version is compared by exact value equality — a
/// mismatch in either direction triggers migration; only an exact match
/// skips it. An absent or non-string version never matches.
pub fn should_migrate(doc: &Value, version_key: &str, target_version: Option<&str>) -> bool {
    match target_version {
        None => true,
        Some(target) => doc.get(version_key).and_then(Value::as_str) != Some(target),
    }
}

// ── Outcome ───────────────────────────────────────────────────

/// Result of a migration run; callers format messages from this, the
/// migrator never raises from inside the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The stored version already matches the target; nothing was read
    /// beyond the document itself and nothing was written.
    UpToDate,
    /// The diff walk ran but found no missing fields; no file write.
    Unchanged,
    /// Fields were added and the document was committed to disk.
    Migrated,
}

// ── Migrator ──────────────────────────────────────────────────

/// Owns the configuration path and the schema-diff template for one
/// migration run. No ambient state: every component that needs the
/// configuration receives its own handle.
pub struct Migrator {
    config_path: PathBuf,
    schema_diff: Map<String, Value>,
    version_key: String,
    target_version: Option<String>,
}

impl Migrator {
    pub fn new(config_path: impl Into<PathBuf>, schema_diff: Map<String, Value>) -> Self {
        Self {
            config_path: config_path.into(),
            schema_diff,
            version_key: crate::config::VERSION_KEY.to_owned(),
            target_version: None,
        }
    }

    /// Override the well-known version key (default `"Version"`).
    pub fn with_version_key(mut self, key: impl Into<String>) -> Self {
        self.version_key = key.into();
        self
    }

    /// Set the schema version to gate on and stamp after migration.
    /// Without a target the migrator runs every boot and never advances the
    /// version field.
    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = Some(version.into());
        self
    }

    /// Run the migration: load → gate → diff → stamp → commit.
    pub fn run(&self) -> Result<MigrationOutcome, StorageError> {
        let mut doc = self.load_document();

        if !should_migrate(&doc, &self.version_key, self.target_version.as_deref()) {
            info!("OTA | config already at schema version, no migration");
            return Ok(MigrationOutcome::UpToDate);
        }

        if let Some(target) = &self.target_version {
            let current = doc
                .get(&self.version_key)
                .and_then(Value::as_str)
                .unwrap_or("<unversioned>");
            info!("OTA | migrating config from {current} to {target}");
        }

        let changed = apply_diff(&mut doc, &self.schema_diff);
        if !changed {
            info!("OTA | migration not necessary, no new objects");
            return Ok(MigrationOutcome::Unchanged);
        }

        match (&self.target_version, doc.as_object_mut()) {
            (Some(target), Some(map)) => {
                map.insert(self.version_key.clone(), Value::String(target.clone()));
            }
            (None, _) => {
                // Unconditional mode has nothing to advance the version to;
                // the field is left untouched so stale stamps never appear
                // current.
                info!("OTA | no target version configured, version field left untouched");
            }
            (Some(_), None) => {}
        }

        let bytes = serde_json::to_vec(&doc).map_err(|e| {
            warn!("OTA | could not serialise migrated config: {e}");
            StorageError::Io(io::ErrorKind::InvalidData)
        })?;
        storage::commit(&self.config_path, &bytes)?;
        info!("OTA | config file updated");
        Ok(MigrationOutcome::Migrated)
    }

    /// Load the document, treating an unreadable or corrupt file as empty:
    /// migration then adds every template field as if starting from scratch.
    fn load_document(&self) -> Value {
        let empty = || Value::Object(Map::new());
        match fs::read(&self.config_path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(doc @ Value::Object(_)) => doc,
                Ok(_) => {
                    warn!("OTA | config root is not a mapping, starting from empty");
                    empty()
                }
                Err(e) => {
                    warn!("OTA | config file corrupt ({e}), starting from empty");
                    empty()
                }
            },
            Err(e) => {
                warn!("OTA | config file unreadable ({e}), starting from empty");
                empty()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
