//! Timestamped backup of a library tree.
//!
//! The backup is a full recursive copy placed next to the library, named
//! `<basename>_backup_<YYYYMMDD_HHMMSS>`. Nothing in the pipeline reads it
//! back; it only exists for the operator.
//!
//! Symlinks are followed and their targets copied. A destination that
//! already exists is an error, and a copy that fails halfway is left as is.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{IoResultExt, MigrateError, MigrateResult};

/// Timestamp format appended to the backup directory name.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Path the backup of `lib_path` would get at `timestamp`.
pub fn backup_path(lib_path: &Path, timestamp: NaiveDateTime) -> MigrateResult<PathBuf> {
    // `.` and friends have no file name until resolved.
    let resolved = match lib_path.file_name() {
        Some(_) => lib_path.to_path_buf(),
        None => lib_path.canonicalize().with_path(lib_path)?,
    };

    let base = resolved.file_name().ok_or_else(|| {
        MigrateError::invalid_argument(format!(
            "cannot derive a backup name from '{}'",
            lib_path.display()
        ))
    })?;

    let name = format!(
        "{}_backup_{}",
        base.to_string_lossy(),
        timestamp.format(BACKUP_TIMESTAMP_FORMAT)
    );
    let parent = resolved.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(name))
}

/// Copy the library tree to a sibling directory stamped with the current local time.
pub fn create_backup(lib_path: &Path) -> MigrateResult<PathBuf> {
    create_backup_at(lib_path, Local::now().naive_local())
}

/// Copy the library tree to a sibling directory stamped with `timestamp`.
pub fn create_backup_at(lib_path: &Path, timestamp: NaiveDateTime) -> MigrateResult<PathBuf> {
    if !lib_path.exists() {
        return Err(MigrateError::LibraryNotFound {
            path: lib_path.to_path_buf(),
        });
    }
    if !lib_path.is_dir() {
        return Err(MigrateError::not_a_directory(lib_path));
    }

    let dest = backup_path(lib_path, timestamp)?;
    copy_tree(lib_path, &dest)?;
    info!(source = %lib_path.display(), backup = %dest.display(), "backup created");
    Ok(dest)
}

/// Recursively copy `source` into a new directory `dest`.
fn copy_tree(source: &Path, dest: &Path) -> MigrateResult<()> {
    fs::create_dir(dest).with_path(dest)?;

    for entry in WalkDir::new(source).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            MigrateError::io(path, std::io::Error::from(e))
        })?;

        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| MigrateError::io_message(entry.path(), e.to_string()))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).with_path(&target)?;
        } else {
            fs::copy(entry.path(), &target).with_path(entry.path())?;
            debug!(file = %rel.display(), "copied");
        }
    }

    Ok(())
}

/// Result of comparing a backup against its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupVerification {
    /// Number of source files compared.
    pub files_checked: usize,
    /// Source files absent from the backup, relative to the source root.
    pub missing: Vec<PathBuf>,
    /// Files whose content differs, relative to the source root.
    pub mismatched: Vec<PathBuf>,
}

impl BackupVerification {
    pub fn is_identical(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// SHA-256 of a file's bytes, hex encoded.
pub fn file_hash(path: &Path) -> MigrateResult<String> {
    let bytes = fs::read(path).with_path(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Compare every file under `source` with its counterpart under `backup`.
pub fn verify_backup(source: &Path, backup: &Path) -> MigrateResult<BackupVerification> {
    let mut result = BackupVerification::default();

    for entry in WalkDir::new(source).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            MigrateError::io(path, std::io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| MigrateError::io_message(entry.path(), e.to_string()))?
            .to_path_buf();
        let copy = backup.join(&rel);
        result.files_checked += 1;

        if !copy.is_file() {
            result.missing.push(rel);
        } else if file_hash(entry.path())? != file_hash(&copy)? {
            result.mismatched.push(rel);
        }
    }

    Ok(result)
}
