use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::ops::LookupSource;

#[derive(Parser, Debug)]
#[command(name = "pokedex-maint")]
#[command(version, about = "Maintenance tools for the Pokedex SQLite database")]
pub struct Cli {
    /// JSON config file overriding the default paths and column lists
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy the database to a timestamped backup file
    Backup {
        /// Backup directory (created if missing)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Delete rows with out-of-range identifiers and VACUUM
    Prune {
        /// Only count the rows that would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// Rebuild the table with only the retained columns
    Reduce,

    /// Export each record in the dex range as <national_dex>.json
    Export {
        /// Output directory (its parent must exist)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run backup, prune, reduce and export in order
    All,

    /// Print a single record
    Show {
        /// National dex number
        national_dex: i64,

        /// Read from the database or from the exported JSON files
        #[arg(long, value_enum, default_value = "db")]
        from: LookupSource,
    },

    /// List the table's current columns
    Columns,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Defaults, then the config file, then command-line flags
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(db) = &self.db {
            config.database = db.clone();
        }
        match &self.command {
            Commands::Backup { dir: Some(dir) } => config.backup_dir = dir.clone(),
            Commands::Export { out: Some(out) } => config.export_dir = out.clone(),
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }
}
