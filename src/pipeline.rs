use std::path::PathBuf;

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::ops::{backup, export_json, prune, reduce_columns, ExportReport, PruneReport, ReduceOutcome};
use crate::ui::{Phase, Ui};

#[derive(Debug)]
pub struct PipelineReport {
    pub backup: PathBuf,
    pub prune: PruneReport,
    pub reduce: ReduceOutcome,
    pub export: ExportReport,
}

/// Backup, prune, reduce, then export. Stops at the first failure.
pub fn run_all(config: &Config, ui: &mut impl Ui) -> Result<PipelineReport> {
    config.validate()?;

    let backup = backup(&config.backup(), ui)?;

    let mut conn = db::open(&config.database)?;
    let prune = prune(&conn, &config.prune(), ui)?;
    let reduce = reduce_columns(&mut conn, &config.reduce(), ui)?;
    let export = export_json(&conn, &config.export(), ui)?;

    ui.set_phase(Phase::Complete);
    Ok(PipelineReport {
        backup,
        prune,
        reduce,
        export,
    })
}
