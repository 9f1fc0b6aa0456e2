//! The sync run: token, bounded fetch, staging overwrite, reconcile, save.

use std::path::Path;

use serde::Serialize;
use tally_engine::{reconcile, Row};
use tally_grid::Workbook;
use tally_store::{acquire_token, load_credentials, project, StoreClient, OAUTH_SCOPE};

use crate::config::RunConfig;
use crate::CliError;

#[derive(Debug, Serialize)]
struct SyncSummary {
    fetched: usize,
    appended: usize,
    anchor_missing: bool,
    unparsed_dates: usize,
}

pub fn cmd_sync(config_path: &Path, json: bool, quiet: bool) -> Result<(), CliError> {
    let config = RunConfig::load(config_path)?;

    // Resolve both sheets before any network call, so a misnamed sheet
    // aborts the run with nothing fetched and nothing written.
    let mut wb = Workbook::open(&config.workbook.path)?;
    wb.sheet(&config.workbook.staging_sheet)?;
    wb.sheet(&config.workbook.ledger_sheet)?;

    let creds = load_credentials(&config.store.credentials)?;
    let token = acquire_token(&creds, OAUTH_SCOPE)?;
    let client = match &config.store.api_base {
        Some(base) => StoreClient::with_base_url(&config.store.project_id, &token, base.clone()),
        None => StoreClient::new(&config.store.project_id, &token),
    };

    let documents = client.run_query(&config.store.collection, config.store.limit)?;
    let snapshot: Vec<Row> = documents.iter().map(project).collect();

    let staging = wb.sheet_mut(&config.workbook.staging_sheet)?;
    staging.replace_all(snapshot.iter().map(|row| row.to_cells()).collect());

    let ledger = wb.sheet_mut(&config.workbook.ledger_sheet)?;
    let outcome = reconcile(&snapshot, ledger)?;
    wb.save(&config.workbook.path)?;

    if outcome.anchor_missing {
        eprintln!(
            "warning: the ledger's last merged row is not in the fetched page; appended the full snapshot",
        );
    }
    if outcome.unparsed_dates > 0 {
        eprintln!(
            "warning: {} appended row(s) kept a date that did not parse",
            outcome.unparsed_dates,
        );
    }

    if json {
        let summary = SyncSummary {
            fetched: snapshot.len(),
            appended: outcome.appended,
            anchor_missing: outcome.anchor_missing,
            unparsed_dates: outcome.unparsed_dates,
        };
        if let Ok(line) = serde_json::to_string(&summary) {
            println!("{}", line);
        }
    } else if !quiet {
        eprintln!(
            "synced {} document(s), appended {} row(s)",
            snapshot.len(),
            outcome.appended,
        );
    }

    Ok(())
}
