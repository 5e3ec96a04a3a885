use clap::ValueEnum;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::ExportConfig;
use crate::db::{self, quote_ident, read_record, Record};
use crate::error::{MaintenanceError, Result};

/// Where a single record is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupSource {
    /// The database table
    Db,
    /// The exported `<n>.json` files
    Json,
}

pub fn lookup(
    source: LookupSource,
    db_path: &Path,
    config: &ExportConfig,
    national_dex: i64,
) -> Result<Record> {
    match source {
        LookupSource::Db => {
            let conn = db::open_read_only(db_path)?;
            lookup_db(&conn, config, national_dex)
        }
        LookupSource::Json => lookup_json(&config.out_dir, national_dex),
    }
}

pub fn lookup_db(conn: &Connection, config: &ExportConfig, national_dex: i64) -> Result<Record> {
    let columns = db::require_columns(conn, &config.table, &[config.dex_column.as_str()])?;
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?1 LIMIT 1",
        quote_ident(&config.table),
        quote_ident(&config.dex_column)
    );
    conn.query_row(&sql, [national_dex], |row| read_record(row, &columns))
        .optional()?
        .ok_or(MaintenanceError::NotFound { national_dex })
}

pub fn lookup_json(out_dir: &Path, national_dex: i64) -> Result<Record> {
    let path = out_dir.join(format!("{}.json", national_dex));
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MaintenanceError::NotFound { national_dex })
        }
        Err(e) => return Err(MaintenanceError::fs(&path, e)),
    };

    match serde_json::from_str::<Value>(&text).map_err(|e| MaintenanceError::fs(&path, e.into()))? {
        Value::Object(record) => Ok(record),
        _ => Err(MaintenanceError::fs(
            &path,
            io::Error::new(io::ErrorKind::InvalidData, "expected a JSON object"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DexRange;
    use serde_json::json;
    use std::path::PathBuf;

    fn config(out_dir: PathBuf) -> ExportConfig {
        ExportConfig {
            table: "pokedex_pokemon".to_string(),
            dex_column: "national_dex".to_string(),
            dex_range: DexRange::default(),
            out_dir,
        }
    }

    #[test]
    fn test_lookup_db() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE pokedex_pokemon (national_dex INTEGER, en TEXT);
             INSERT INTO pokedex_pokemon VALUES (25, 'Pikachu');",
        )
        .unwrap();
        let config = config(PathBuf::from("unused"));

        let record = lookup_db(&conn, &config, 25).unwrap();
        assert_eq!(record["en"], json!("Pikachu"));

        assert!(matches!(
            lookup_db(&conn, &config, 99999),
            Err(MaintenanceError::NotFound { national_dex: 99999 })
        ));
    }

    #[test]
    fn test_lookup_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("7.json"), r#"{"national_dex": 7, "en": "Squirtle"}"#).unwrap();
        fs::write(dir.path().join("8.json"), "[1, 2]").unwrap();

        let record = lookup_json(dir.path(), 7).unwrap();
        assert_eq!(record["en"], json!("Squirtle"));

        assert_eq!(lookup_json(dir.path(), 9999).unwrap_err().exit_code(), 6);
        assert_eq!(lookup_json(dir.path(), 8).unwrap_err().exit_code(), 3);
    }
}
