use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::db::{self, file_stem, quote_ident, read_record, Record};
use crate::error::{MaintenanceError, Result};
use crate::ui::{Phase, Ui};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub written: u64,
    /// `*.json` files in the output directory not written by this run
    pub stale: Vec<PathBuf>,
}

/// Select the records whose dex number lies in the configured range
pub fn select_records(conn: &Connection, config: &ExportConfig) -> Result<Vec<Record>> {
    let columns = db::require_columns(conn, &config.table, &[config.dex_column.as_str()])?;

    let sql = format!(
        "SELECT * FROM {} WHERE {} BETWEEN ?1 AND ?2",
        quote_ident(&config.table),
        quote_ident(&config.dex_column)
    );
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map(params![config.dex_range.low, config.dex_range.high], |row| {
            read_record(row, &columns)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// Write one pretty-printed `<national_dex>.json` per record.
///
/// The output directory is created if absent, but its parent must exist.
/// Existing files are overwritten; files from earlier runs are left alone.
pub fn export_json(conn: &Connection, config: &ExportConfig, ui: &mut impl Ui) -> Result<ExportReport> {
    ui.set_phase(Phase::Export);

    let records = select_records(conn, config)?;
    ui.log(format!("🔍 Records found: {}", records.len()));

    if !config.out_dir.exists() {
        fs::create_dir(&config.out_dir).map_err(|e| MaintenanceError::fs(&config.out_dir, e))?;
    }

    let total = records.len() as u64;
    let mut written_names = HashSet::new();
    let mut processed: u64 = 0;

    for record in &records {
        processed += 1;
        let dex = record.get(&config.dex_column);
        let Some(stem) = dex.and_then(file_stem) else {
            ui.log(format!(
                "⚠️ Skipping record with unusable {}: {}",
                config.dex_column,
                dex.unwrap_or(&serde_json::Value::Null)
            ));
            continue;
        };
        let file_name = format!("{}.json", stem);
        let path = config.out_dir.join(&file_name);

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| MaintenanceError::fs(&path, e.into()))?;
        fs::write(&path, json).map_err(|e| MaintenanceError::fs(&path, e))?;

        written_names.insert(file_name.clone());
        ui.set_progress(processed, total, file_name);
    }
    ui.clear_progress();

    // Duplicate dex numbers overwrite the same file
    let written = written_names.len() as u64;

    let stale = stale_files(&config.out_dir, &written_names)?;
    if !stale.is_empty() {
        ui.log(format!(
            "⚠️ {} stale JSON files left in {}",
            stale.len(),
            config.out_dir.display()
        ));
    }

    ui.log(format!("✅ JSON export complete: {} files", written));
    Ok(ExportReport { written, stale })
}

fn stale_files(out_dir: &Path, written: &HashSet<String>) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(out_dir).map_err(|e| MaintenanceError::fs(out_dir, e))?;

    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MaintenanceError::fs(out_dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !written.contains(name) {
                stale.push(path);
            }
        }
    }
    stale.sort();
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DexRange;
    use crate::ui::SilentUi;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE pokedex_pokemon (national_dex INTEGER, en TEXT, type_second TEXT);
             INSERT INTO pokedex_pokemon VALUES (0, 'MissingNo', NULL);
             INSERT INTO pokedex_pokemon VALUES (1, 'Bulbasaur', 'Poison');
             INSERT INTO pokedex_pokemon VALUES (1025, 'Pecharunt', 'Ghost');
             INSERT INTO pokedex_pokemon VALUES (1026, 'Future', NULL);",
        )
        .unwrap();
        conn
    }

    fn config(out_dir: PathBuf) -> ExportConfig {
        ExportConfig {
            table: "pokedex_pokemon".to_string(),
            dex_column: "national_dex".to_string(),
            dex_range: DexRange::default(),
            out_dir,
        }
    }

    #[test]
    fn test_select_records_uses_closed_interval() {
        let conn = seeded();
        let records = select_records(&conn, &config(PathBuf::from("unused"))).unwrap();
        let dex: Vec<i64> = records
            .iter()
            .map(|r| r["national_dex"].as_i64().unwrap())
            .collect();
        assert_eq!(dex, vec![1, 1025]);
    }

    #[test]
    fn test_export_writes_pretty_json_per_record() {
        let conn = seeded();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json");

        let report = export_json(&conn, &config(out.clone()), &mut SilentUi::new()).unwrap();
        assert_eq!(report.written, 2);
        assert!(report.stale.is_empty());

        let text = fs::read_to_string(out.join("1.json")).unwrap();
        assert_eq!(
            text,
            "{\n  \"national_dex\": 1,\n  \"en\": \"Bulbasaur\",\n  \"type_second\": \"Poison\"\n}"
        );
        assert!(out.join("1025.json").exists());
        assert!(!out.join("0.json").exists());
        assert!(!out.join("1026.json").exists());
    }

    #[test]
    fn test_select_records_matches_dex_range() {
        let conn = seeded();
        let config = config(PathBuf::from("unused"));
        let selected: Vec<i64> = select_records(&conn, &config)
            .unwrap()
            .iter()
            .map(|r| r["national_dex"].as_i64().unwrap())
            .collect();

        for dex in [0, 1, 1025, 1026] {
            assert_eq!(selected.contains(&dex), config.dex_range.contains(dex), "dex {}", dex);
        }
    }

    #[test]
    fn test_text_dex_cannot_escape_output_dir() {
        let conn = Connection::open_in_memory().unwrap();
        // TEXT affinity: the bounds compare as '1' and '1025'
        conn.execute_batch(
            "CREATE TABLE pokedex_pokemon (national_dex TEXT, en TEXT);
             INSERT INTO pokedex_pokemon VALUES ('1', 'Bulbasaur');
             INSERT INTO pokedex_pokemon VALUES ('10/../../escaped', 'Sneaky');",
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json");
        fs::create_dir_all(out.join("10")).unwrap();

        let config = config(out.clone());
        assert_eq!(select_records(&conn, &config).unwrap().len(), 2);

        let report = export_json(&conn, &config, &mut SilentUi::new()).unwrap();
        assert_eq!(report.written, 1);
        assert!(!dir.path().join("escaped.json").exists());
        assert!(out.join("1.json").exists());
    }

    #[test]
    fn test_duplicate_dex_counts_one_file() {
        let conn = seeded();
        conn.execute("INSERT INTO pokedex_pokemon VALUES (1, 'Bulbasaur again', NULL)", [])
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json");

        let report = export_json(&conn, &config(out.clone()), &mut SilentUi::new()).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
        let text = fs::read_to_string(out.join("1.json")).unwrap();
        assert!(text.contains("Bulbasaur again"));
    }

    #[test]
    fn test_export_reports_stale_files() {
        let conn = seeded();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_path_buf();
        fs::write(out.join("9999.json"), "{}").unwrap();
        fs::write(out.join("notes.txt"), "keep").unwrap();

        let report = export_json(&conn, &config(out.clone()), &mut SilentUi::new()).unwrap();
        assert_eq!(report.stale, vec![out.join("9999.json")]);
        assert!(out.join("9999.json").exists());
    }

    #[test]
    fn test_export_does_not_create_parents() {
        let conn = seeded();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("json");

        let err = export_json(&conn, &config(out.clone()), &mut SilentUi::new()).unwrap_err();
        assert!(matches!(err, MaintenanceError::Filesystem { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_dex_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE pokedex_pokemon (en TEXT)").unwrap();
        let err = select_records(&conn, &config(PathBuf::from("unused"))).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
