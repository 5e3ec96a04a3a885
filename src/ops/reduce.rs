use rusqlite::Connection;

use crate::config::ReduceConfig;
use crate::db::{self, quote_ident};
use crate::error::Result;
use crate::ui::{Phase, Ui};

/// What the column reducer did. Any error leaves the table untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// Table rebuilt with only the retained columns
    Applied { rows: u64, dropped: Vec<String> },
    /// Table already had exactly the retained columns, in order
    AlreadyReduced { rows: u64 },
}

/// Rebuild the table keeping only `keep_columns`.
///
/// Create-copy, drop-original and rename run in one transaction, so a
/// failure at any step rolls back to the original table.
pub fn reduce_columns(
    conn: &mut Connection,
    config: &ReduceConfig,
    ui: &mut impl Ui,
) -> Result<ReduceOutcome> {
    ui.set_phase(Phase::Reduce);
    let existing = db::require_columns(conn, &config.table, &config.keep_columns)?;

    if existing == config.keep_columns {
        let rows = db::row_count(conn, &config.table)?;
        ui.log("✅ Table already reduced, nothing to do");
        return Ok(ReduceOutcome::AlreadyReduced { rows });
    }

    let table = quote_ident(&config.table);
    let staging = quote_ident(&format!("{}_new", config.table));
    let select_list = config
        .keep_columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        "CREATE TABLE {} AS SELECT {} FROM {}",
        staging, select_list, table
    ))?;
    ui.log("✅ Reduced copy created");

    tx.execute_batch(&format!("DROP TABLE {}", table))?;
    ui.log("✅ Original table dropped");

    tx.execute_batch(&format!("ALTER TABLE {} RENAME TO {}", staging, table))?;
    ui.log("✅ Reduced copy renamed");

    let rows = db::row_count(&tx, &config.table)?;
    tx.commit()?;

    let dropped = existing
        .into_iter()
        .filter(|c| !config.keep_columns.contains(c))
        .collect();
    Ok(ReduceOutcome::Applied { rows, dropped })
}
