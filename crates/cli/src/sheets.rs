//! Workbook-only commands: init, sheet-add, track, and report.

use std::path::Path;

use tally_engine::{report, track_by_marker, EngineError, Row};
use tally_grid::Workbook;

use crate::config::RunConfig;
use crate::filter::{build_predicate, parse_where};
use crate::CliError;

pub fn cmd_init(config_path: &Path, quiet: bool) -> Result<(), CliError> {
    let config = RunConfig::load(config_path)?;
    let mut wb = Workbook::create(&config.workbook.path)?;
    // The staging sheet mirrors the raw fetched page and carries no header.
    wb.add_sheet(&config.workbook.staging_sheet)?;
    let ledger = wb.add_sheet(&config.workbook.ledger_sheet)?;
    ledger.append_row(Row::header_cells());
    wb.save(&config.workbook.path)?;
    if !quiet {
        eprintln!(
            "created workbook {} with sheets {:?} and {:?}",
            config.workbook.path.display(),
            config.workbook.staging_sheet,
            config.workbook.ledger_sheet,
        );
    }
    Ok(())
}

pub fn cmd_sheet_add(config_path: &Path, name: &str, quiet: bool) -> Result<(), CliError> {
    let config = RunConfig::load(config_path)?;
    let mut wb = Workbook::open(&config.workbook.path)?;
    let sheet = wb.add_sheet(name)?;
    sheet.append_row(Row::header_cells());
    wb.save(&config.workbook.path)?;
    if !quiet {
        eprintln!("added sheet {:?} to {}", name, config.workbook.path.display());
    }
    Ok(())
}

/// Ledger body as rows, refusing a ledger that was never given a header.
fn load_ledger_rows(wb: &Workbook, name: &str) -> Result<Vec<Row>, CliError> {
    let ledger = wb.sheet(name)?;
    if ledger.header().is_none() {
        return Err(EngineError::MissingHeader(name.to_string()).into());
    }
    Ok(ledger.body().iter().map(|cells| Row::from_cells(cells)).collect())
}

pub fn cmd_track(config_path: &Path, marker: &str, out: &str, quiet: bool) -> Result<(), CliError> {
    if marker.is_empty() {
        return Err(CliError::usage("--marker must not be empty"));
    }
    let config = RunConfig::load(config_path)?;
    let mut wb = Workbook::open(&config.workbook.path)?;
    let ledger_rows = load_ledger_rows(&wb, &config.workbook.ledger_sheet)?;
    let view = wb.sheet_mut(out)?;
    let appended = track_by_marker(marker, &ledger_rows, view)?;
    wb.save(&config.workbook.path)?;
    if !quiet {
        eprintln!("tracked {} new row(s) for marker {:?} into {}", appended, marker, out);
    }
    Ok(())
}

pub fn cmd_report(
    config_path: &Path,
    days: i64,
    where_exprs: &[String],
    out: &str,
    quiet: bool,
) -> Result<(), CliError> {
    if days < 0 {
        return Err(CliError::usage("--days must not be negative"));
    }
    let exprs = where_exprs
        .iter()
        .map(|e| parse_where(e))
        .collect::<Result<Vec<_>, _>>()?;
    let predicate = build_predicate(exprs);

    let config = RunConfig::load(config_path)?;
    let mut wb = Workbook::open(&config.workbook.path)?;
    let ledger_rows = load_ledger_rows(&wb, &config.workbook.ledger_sheet)?;
    let view = wb.sheet_mut(out)?;
    let today = chrono::Local::now().date_naive();
    let kept = report(&predicate, days, today, &ledger_rows, view)?;
    wb.save(&config.workbook.path)?;
    if !quiet {
        eprintln!("report wrote {} row(s) from the last {} day(s) into {}", kept, days, out);
    }
    Ok(())
}
