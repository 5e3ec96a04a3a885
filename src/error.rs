//! Error taxonomy shared by every maintenance operation.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// The database file to back up does not exist
    #[error("database does not exist: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("table not found: {table}")]
    MissingTable { table: String },

    #[error("table {table} is missing columns: {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no record with national dex number {national_dex}")]
    NotFound { national_dex: i64 },
}

impl MaintenanceError {
    pub fn fs(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingSource { .. } => 1,
            Self::Storage(_) => 2,
            Self::Filesystem { .. } => 3,
            Self::MissingTable { .. } | Self::MissingColumns { .. } => 4,
            Self::Config(_) => 5,
            Self::NotFound { .. } => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, MaintenanceError>;
