use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BackupConfig;
use crate::error::{MaintenanceError, Result};
use crate::ui::{Phase, Ui};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Copy the database into the backup directory, stamped with local time
pub fn backup(config: &BackupConfig, ui: &mut impl Ui) -> Result<PathBuf> {
    backup_at(config, Local::now().naive_local(), ui)
}

/// Same as [`backup`] with an explicit timestamp.
///
/// Two backups taken within the same second share a name; the later copy
/// overwrites the earlier one.
pub fn backup_at(config: &BackupConfig, now: NaiveDateTime, ui: &mut impl Ui) -> Result<PathBuf> {
    ui.set_phase(Phase::Backup);

    if !config.source.is_file() {
        return Err(MaintenanceError::MissingSource {
            path: config.source.clone(),
        });
    }

    fs::create_dir_all(&config.dest_dir).map_err(|e| MaintenanceError::fs(&config.dest_dir, e))?;

    let dest = config.dest_dir.join(backup_file_name(&config.source, now));
    fs::copy(&config.source, &dest).map_err(|e| MaintenanceError::fs(&dest, e))?;

    ui.log(format!("✅ Backup complete: {}", dest.display()));
    Ok(dest)
}

/// `db_<YYYYMMDD_HHMMSS>` plus the source's extension, if any
pub fn backup_file_name(source: &Path, now: NaiveDateTime) -> String {
    let stamp = now.format(TIMESTAMP_FORMAT);
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("db_{}.{}", stamp, ext),
        None => format!("db_{}", stamp),
    }
}
