//! Copies the database file to and from a backup location.
//!
//! Both functions copy the file byte for byte, so no connection to the
//! database may be open while they run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::Error;

/// Copy the database at `db_path` into `backup_dir` as `backup_<file name>`.
///
/// `backup_dir` is created if it does not exist. An existing backup with the
/// same name is overwritten. Returns the path of the backup file.
///
/// # Errors
/// Returns an [Error::BackupError] if `db_path` has no file name, or the
/// directory or the copy cannot be created.
pub fn backup_database(db_path: &Path, backup_dir: &Path) -> Result<PathBuf, Error> {
    let file_name = db_path.file_name().ok_or_else(|| {
        Error::BackupError(format!("{} does not name a file", db_path.display()))
    })?;

    fs::create_dir_all(backup_dir).map_err(|error| {
        tracing::error!("Could not create backup directory {}: {error}", backup_dir.display());
        Error::BackupError(error.to_string())
    })?;

    let mut backup_name = std::ffi::OsString::from("backup_");
    backup_name.push(file_name);
    let backup_file = backup_dir.join(backup_name);

    fs::copy(db_path, &backup_file).map_err(|error| {
        tracing::error!(
            "Could not back up {} to {}: {error}",
            db_path.display(),
            backup_file.display()
        );
        Error::BackupError(error.to_string())
    })?;

    tracing::info!("Database backed up to {}", backup_file.display());

    Ok(backup_file)
}

/// Replace the database at `db_path` with the contents of `backup_file`.
///
/// Returns `false` without touching `db_path` if `backup_file` does not exist.
///
/// # Errors
/// Returns an [Error::BackupError] if the copy fails.
pub fn restore_database(backup_file: &Path, db_path: &Path) -> Result<bool, Error> {
    if !backup_file.is_file() {
        tracing::warn!("Backup file {} does not exist", backup_file.display());
        return Ok(false);
    }

    fs::copy(backup_file, db_path).map_err(|error| {
        tracing::error!(
            "Could not restore {} from {}: {error}",
            db_path.display(),
            backup_file.display()
        );
        Error::BackupError(error.to_string())
    })?;

    tracing::info!("Database restored from {}", backup_file.display());

    Ok(true)
}
