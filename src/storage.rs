//! Atomic file persistence.
//!
//! A content-agnostic "write a new version of a named file safely" primitive,
//! shared by the config migrator and the module updater. The protocol:
//!
//! ```text
//!   1. write new content to <path>.tmp
//!   2. if <path> exists: drop stale <path>.bak, rename <path> -> <path>.bak
//!   3. rename <path>.tmp -> <path>
//! ```
//!
//! A crash before step 2 leaves the original untouched; a crash between
//! steps 2 and 3 leaves either the backup or the original named `path`, with
//! the new content intact in the `.tmp` file. Exactly one backup generation
//! is retained per managed file.
//!
//! The dispatch loop is single-threaded, but tests (and any future executor)
//! may run commits from multiple threads, so a process-wide lock keeps the
//! protocol from interleaving on the same path.

use core::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{info, warn};

const TMP_SUFFIX: &str = ".tmp";
const BAK_SUFFIX: &str = ".bak";

static COMMIT_LOCK: Mutex<()> = Mutex::new(());

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// A filesystem operation failed; the previous file generation was
    /// restored (or never disturbed).
    Io(io::ErrorKind),
    /// A filesystem operation failed and the backup could not be put back.
    /// The managed path may be absent or stale — callers must treat
    /// subsequent reads as possibly failing.
    Unrecoverable(io::ErrorKind),
    /// `restore` found no backup file; nothing to recover.
    NoBackup,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error ({kind:?}), previous file intact"),
            Self::Unrecoverable(kind) => {
                write!(f, "I/O error ({kind:?}) and backup restore failed")
            }
            Self::NoBackup => write!(f, "no backup found"),
        }
    }
}

// ── Derived paths ─────────────────────────────────────────────

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(TMP_SUFFIX);
    PathBuf::from(os)
}

fn bak_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(BAK_SUFFIX);
    PathBuf::from(os)
}

// ── Commit / restore ──────────────────────────────────────────

/// Durably replace the content of `path` with `contents`.
///
/// On success the file at `path` holds exactly `contents`, the prior content
/// (if any) lives in `path.bak`, and no `.tmp` file remains. On failure the
/// previous generation is restored where possible and the error reports
/// which guarantee still holds.
pub fn commit(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let _guard = COMMIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let tmp = tmp_path(path);
    let bak = bak_path(path);

    // Step 1 — the original is untouched no matter what happens here.
    if let Err(e) = fs::write(&tmp, contents) {
        warn!("STORE | temp write failed for {}: {}", path.display(), e);
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::Io(e.kind()));
    }

    match rotate_and_swap(path, &tmp, &bak) {
        Ok(()) => {
            info!("STORE | committed {} ({} bytes)", path.display(), contents.len());
            Ok(())
        }
        Err(e) => {
            warn!(
                "STORE | commit failed for {}: {}. Restoring backup...",
                path.display(),
                e
            );
            match restore_locked(path) {
                Ok(()) => Err(StorageError::Io(e.kind())),
                // No backup and the original still in place: nothing was
                // rotated, the failure happened before step 2 completed.
                Err(StorageError::NoBackup) if path.exists() => Err(StorageError::Io(e.kind())),
                Err(_) => Err(StorageError::Unrecoverable(e.kind())),
            }
        }
    }
}

// Steps 2–3 — each operation fallible, order never changed.
fn rotate_and_swap(path: &Path, tmp: &Path, bak: &Path) -> io::Result<()> {
    if path.exists() {
        if bak.exists() {
            fs::remove_file(bak)?;
        }
        fs::rename(path, bak)?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

/// Rename `path.bak` back into place — best-effort recovery to the last
/// known-good generation.
pub fn restore(path: &Path) -> Result<(), StorageError> {
    let _guard = COMMIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    restore_locked(path)
}

// Split out so `commit` can restore while already holding the lock
// (std::sync::Mutex is not reentrant).
fn restore_locked(path: &Path) -> Result<(), StorageError> {
    let bak = bak_path(path);
    if !bak.exists() {
        warn!("STORE | no backup found for {}", path.display());
        return Err(StorageError::NoBackup);
    }
    match fs::rename(&bak, path) {
        Ok(()) => {
            info!("STORE | backup restored for {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!("STORE | backup restore failed for {}: {}", path.display(), e);
            Err(StorageError::Unrecoverable(e.kind()))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
