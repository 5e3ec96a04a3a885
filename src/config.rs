use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MaintenanceError, Result};

pub const DEFAULT_DATABASE: &str = "database/db.sqlite3";
pub const DEFAULT_BACKUP_DIR: &str = "backup";
pub const DEFAULT_EXPORT_DIR: &str = "json";
pub const DEFAULT_TABLE: &str = "pokedex_pokemon";

/// Zero-padded identifier columns checked by prune
pub const ID_COLUMNS: &[&str] = &["species_id", "pokemon_id", "form_id"];

/// Columns retained by the column reducer, in output order
pub const KEEP_COLUMNS: &[&str] = &[
    "national_dex",
    "ja",
    "en",
    "type_first",
    "type_second",
    "front_default_url",
    "base_h",
    "base_a",
    "base_b",
    "base_c",
    "base_d",
    "base_s",
];

/// Inclusive text range compared lexicographically by SQLite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdRange {
    pub low: String,
    pub high: String,
}

impl Default for IdRange {
    fn default() -> Self {
        Self {
            low: "00001".to_string(),
            high: "01025".to_string(),
        }
    }
}

impl IdRange {
    /// Byte-wise comparison, matching SQLite's BINARY collation
    pub fn contains(&self, value: &str) -> bool {
        self.low.as_str() <= value && value <= self.high.as_str()
    }
}

/// Inclusive integer range of national dex numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DexRange {
    pub low: i64,
    pub high: i64,
}

impl Default for DexRange {
    fn default() -> Self {
        Self { low: 1, high: 1025 }
    }
}

impl DexRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// Full configuration. Every field defaults to the conventional layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: PathBuf,
    pub backup_dir: PathBuf,
    pub export_dir: PathBuf,
    pub table: String,
    pub id_columns: Vec<String>,
    pub id_range: IdRange,
    pub keep_columns: Vec<String>,
    pub dex_column: String,
    pub dex_range: DexRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            table: DEFAULT_TABLE.to_string(),
            id_columns: ID_COLUMNS.iter().map(|s| s.to_string()).collect(),
            id_range: IdRange::default(),
            keep_columns: KEEP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            dex_column: "national_dex".to_string(),
            dex_range: DexRange::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            MaintenanceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            MaintenanceError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(MaintenanceError::Config("table name is empty".into()));
        }
        if self.id_columns.is_empty() {
            return Err(MaintenanceError::Config("id_columns is empty".into()));
        }
        if self.keep_columns.is_empty() {
            return Err(MaintenanceError::Config("keep_columns is empty".into()));
        }
        if self.id_range.low > self.id_range.high {
            return Err(MaintenanceError::Config(format!(
                "id_range low {:?} is above high {:?}",
                self.id_range.low, self.id_range.high
            )));
        }
        if self.dex_range.low > self.dex_range.high {
            return Err(MaintenanceError::Config(format!(
                "dex_range low {} is above high {}",
                self.dex_range.low, self.dex_range.high
            )));
        }
        Ok(())
    }

    pub fn backup(&self) -> BackupConfig {
        BackupConfig {
            source: self.database.clone(),
            dest_dir: self.backup_dir.clone(),
        }
    }

    pub fn prune(&self) -> PruneConfig {
        PruneConfig {
            table: self.table.clone(),
            id_columns: self.id_columns.clone(),
            id_range: self.id_range.clone(),
        }
    }

    pub fn reduce(&self) -> ReduceConfig {
        ReduceConfig {
            table: self.table.clone(),
            keep_columns: self.keep_columns.clone(),
        }
    }

    pub fn export(&self) -> ExportConfig {
        ExportConfig {
            table: self.table.clone(),
            dex_column: self.dex_column.clone(),
            dex_range: self.dex_range,
            out_dir: self.export_dir.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PruneConfig {
    pub table: String,
    pub id_columns: Vec<String>,
    pub id_range: IdRange,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Config::default().prune()
    }
}

#[derive(Debug, Clone)]
pub struct ReduceConfig {
    pub table: String,
    pub keep_columns: Vec<String>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Config::default().reduce()
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub table: String,
    pub dex_column: String,
    pub dex_range: DexRange,
    pub out_dir: PathBuf,
}
