use anyhow::{Context, Result};
use pokedex_maint::{
    cli::{Cli, Commands},
    config::Config,
    db::{self, format_bytes},
    ops::{backup, count_out_of_range, export_json, lookup, prune, reduce_columns, ReduceOutcome},
    pipeline::run_all,
    ConsoleUi, MaintenanceError, SilentUi, Ui,
};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = if cli.quiet {
        run(&cli, &mut SilentUi::new())
    } else {
        run(&cli, &mut ConsoleUi::new())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            let code = err
                .downcast_ref::<MaintenanceError>()
                .map(MaintenanceError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: &Cli, ui: &mut impl Ui) -> Result<()> {
    let config = cli.resolve_config()?;
    let start = Instant::now();

    match &cli.command {
        Commands::Backup { .. } => {
            backup(&config.backup(), ui)?;
        }

        Commands::Prune { dry_run: true } => {
            let conn = db::open_read_only(&config.database)?;
            let count = count_out_of_range(&conn, &config.prune())?;
            ui.log(format!("🔍 {} records would be deleted", count));
        }

        Commands::Prune { dry_run: false } => {
            let conn = db::open(&config.database)?;
            let report = prune(&conn, &config.prune(), ui)?;
            ui.log(format!(
                "{} records remain ({} reclaimed)",
                report.remaining,
                format_bytes(report.size_before.saturating_sub(report.size_after))
            ));
        }

        Commands::Reduce => {
            let mut conn = db::open(&config.database)?;
            if let ReduceOutcome::Applied { rows, dropped } =
                reduce_columns(&mut conn, &config.reduce(), ui)?
            {
                ui.log(format!("{} rows kept, dropped columns: {}", rows, dropped.join(", ")));
            }
        }

        Commands::Export { .. } => {
            let conn = db::open_read_only(&config.database)?;
            export_json(&conn, &config.export(), ui)?;
        }

        Commands::All => {
            let report = run_all(&config, ui)?;
            ui.log(format!(
                "Backup {}, {} deleted, {} exported",
                report.backup.display(),
                report.prune.deleted,
                report.export.written
            ));
        }

        Commands::Show { national_dex, from } => {
            let record = lookup(*from, &config.database, &config.export(), *national_dex)?;
            let text = serde_json::to_string_pretty(&record).context("Failed to format record")?;
            println!("{}", text);
            return Ok(());
        }

        Commands::Columns => {
            print_columns(&config)?;
            return Ok(());
        }
    }

    ui.log(format!("Done in {:.1}s", start.elapsed().as_secs_f64()));
    Ok(())
}

fn print_columns(config: &Config) -> Result<()> {
    let conn = db::open_read_only(&config.database)?;
    let columns = db::require_columns(&conn, &config.table, &[] as &[&str])?;

    println!("Columns of {}:\n", config.table);
    for name in columns {
        let marker = if config.keep_columns.contains(&name) { "*" } else { " " };
        println!("  {} {}", marker, name);
    }
    Ok(())
}
