//! Remote module update flow.
//!
//! Fetches a candidate version of a named runtime module, decides whether it
//! differs from the installed one, and replaces the file through the atomic
//! [`storage`](crate::storage) commit. Replacing the entry-point module
//! additionally requires a device restart — that decision is reported to the
//! caller, never executed here.
//!
//! Side effects are observable only through filesystem state and the
//! returned status; network fetch, restart and reply delivery are external
//! collaborators behind ports.

use core::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::app::ports::FetchPort;
use crate::storage;

// ── Status & error types ──────────────────────────────────────

/// Caller-visible outcome of one update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// The module file now holds the fetched bytes.
    Updated { restart_required: bool },
    /// Fetched bytes are identical to the installed module; nothing written.
    Unchanged,
    /// The update did not happen; the previous module is still in place
    /// (except for the commit-failure cases documented on `StorageError`).
    Failed(UpdateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateError {
    /// Module name contains a path separator or parent-directory token.
    InvalidName,
    /// The fetch collaborator answered with a non-200 status.
    FetchStatus(u16),
    /// The fetch collaborator failed outright (timeout, no connection).
    FetchTransport,
    /// The installed module exists but could not be read for comparison.
    ReadFailed,
    /// Atomic commit of the new module failed.
    WriteFailed,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "invalid module name"),
            Self::FetchStatus(code) => write!(f, "download failed (HTTP {code})"),
            Self::FetchTransport => write!(f, "download failed (no response)"),
            Self::ReadFailed => write!(f, "installed module unreadable"),
            Self::WriteFailed => write!(f, "module write failed"),
        }
    }
}

// ── Module name validation ────────────────────────────────────

/// The sole input-validation boundary protecting the filesystem namespace:
/// a module is a bare file name inside the module directory.
fn valid_module_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

// ── Updater ───────────────────────────────────────────────────

/// Owns the module directory and the entry-module policy for update
/// requests arriving over the command channel.
pub struct ModuleUpdater {
    module_dir: PathBuf,
    entry_module: String,
}

impl ModuleUpdater {
    pub fn new(module_dir: impl Into<PathBuf>, entry_module: impl Into<String>) -> Self {
        Self {
            module_dir: module_dir.into(),
            entry_module: entry_module.into(),
        }
    }

    /// Fetch `url` and install it as `module_name` if the content differs
    /// from what is on disk.
    ///
    /// Runs to completion once started; there is no safe mid-commit abort
    /// point that would not need the same recovery logic anyway.
    pub fn update_module(
        &self,
        fetch: &mut impl FetchPort,
        module_name: &str,
        url: &str,
    ) -> UpdateStatus {
        if !valid_module_name(module_name) {
            warn!("OTA | invalid module name {module_name:?}");
            return UpdateStatus::Failed(UpdateError::InvalidName);
        }

        info!("OTA | downloading update for {module_name}");
        let response = match fetch.fetch(url) {
            Ok(r) => r,
            Err(e) => {
                warn!("OTA | download of {module_name} failed: {e}");
                return UpdateStatus::Failed(UpdateError::FetchTransport);
            }
        };
        if response.status != 200 {
            warn!("OTA | download of {module_name} failed: HTTP {}", response.status);
            return UpdateStatus::Failed(UpdateError::FetchStatus(response.status));
        }

        let path = self.module_dir.join(module_name);
        let installed = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                // An unreadable-but-present module is a broken deployment;
                // replacing it blind could mask the underlying fault.
                warn!("OTA | could not read installed {module_name}: {e}");
                return UpdateStatus::Failed(UpdateError::ReadFailed);
            }
        };

        if installed.as_deref() == Some(response.body.as_slice()) {
            info!("OTA | no update needed for {module_name}");
            return UpdateStatus::Unchanged;
        }

        match storage::commit(&path, &response.body) {
            Ok(()) => {
                info!("OTA | {module_name} updated ({} bytes)", response.body.len());
                UpdateStatus::Updated {
                    restart_required: module_name.eq_ignore_ascii_case(&self.entry_module),
                }
            }
            Err(e) => {
                warn!("OTA | could not write {module_name}: {e}");
                UpdateStatus::Failed(UpdateError::WriteFailed)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
