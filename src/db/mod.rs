mod record;

pub use record::*;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::error::{MaintenanceError, Result};

/// Open an existing database for modification. Never creates the file.
pub fn open(db_path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(db_path, flags)?)
}

/// Open an existing database for reading only
pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(db_path, flags)?)
}

/// Quote an identifier for interpolation into SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column names of `table` in declaration order. Empty if the table is absent.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Fail unless `table` exists and has every column in `required`.
///
/// SQLite resolves an unknown double-quoted identifier to a string literal,
/// so this must run before any statement built from configured names.
pub fn require_columns<S: AsRef<str>>(
    conn: &Connection,
    table: &str,
    required: &[S],
) -> Result<Vec<String>> {
    if !table_exists(conn, table)? {
        return Err(MaintenanceError::MissingTable {
            table: table.to_string(),
        });
    }

    let columns = table_columns(conn, table)?;
    let missing: Vec<String> = required
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !columns.iter().any(|existing| existing == c))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(MaintenanceError::MissingColumns {
            table: table.to_string(),
            columns: missing,
        });
    }

    Ok(columns)
}

pub fn row_count(conn: &Connection, table: &str) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Size of the main database in bytes (page_count * page_size)
pub fn database_size(conn: &Connection) -> Result<u64> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
    Ok((page_count * page_size) as u64)
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
