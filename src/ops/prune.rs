use rusqlite::{params, Connection};

use crate::config::PruneConfig;
use crate::db::{self, format_bytes, quote_ident};
use crate::error::Result;
use crate::ui::{Phase, Ui};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: u64,
    pub remaining: u64,
    pub size_before: u64,
    pub size_after: u64,
}

/// WHERE clause matching rows with any identifier outside the text range.
/// `?1`/`?2` are the low/high bounds.
fn out_of_range_predicate(id_columns: &[String]) -> String {
    id_columns
        .iter()
        .map(|c| format!("{} NOT BETWEEN ?1 AND ?2", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Count rows that [`prune`] would delete, without touching the table
pub fn count_out_of_range(conn: &Connection, config: &PruneConfig) -> Result<u64> {
    db::require_columns(conn, &config.table, &config.id_columns)?;

    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {}",
        quote_ident(&config.table),
        out_of_range_predicate(&config.id_columns)
    );
    let count: i64 = conn.query_row(
        &sql,
        params![config.id_range.low, config.id_range.high],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Delete rows whose identifiers fall outside the configured range, then VACUUM.
///
/// Identifiers compare as text. A NULL identifier never matches `NOT BETWEEN`,
/// so such rows are kept. VACUUM needs exclusive access to the file.
pub fn prune(conn: &Connection, config: &PruneConfig, ui: &mut impl Ui) -> Result<PruneReport> {
    ui.set_phase(Phase::Prune);
    db::require_columns(conn, &config.table, &config.id_columns)?;

    let size_before = db::database_size(conn)?;

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(&config.table),
        out_of_range_predicate(&config.id_columns)
    );
    let deleted = conn.execute(&sql, params![config.id_range.low, config.id_range.high])? as u64;
    ui.log(format!("✅ Deleted {} records", deleted));

    ui.set_phase(Phase::Compact);
    conn.execute_batch("VACUUM")?;
    let size_after = db::database_size(conn)?;
    ui.log(format!(
        "✅ VACUUM complete: {} -> {}",
        format_bytes(size_before),
        format_bytes(size_after)
    ));

    Ok(PruneReport {
        deleted,
        remaining: db::row_count(conn, &config.table)?,
        size_before,
        size_after,
    })
}
