use serde::Serialize;
use tally_grid::Sheet;

use crate::error::EngineError;
use crate::row::{display_date, parse_date, Row, COL_DATE, COL_USER_ID};

/// Where the ledger's last-merged key was found in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorScan {
    /// Snapshot index of the newest already-merged row.
    Found(usize),
    /// The ledger has rows but its last key is not in the snapshot.
    NotFound,
    /// The ledger has no data rows yet.
    LedgerEmpty,
}

/// Scan a newest-first snapshot from its oldest entry backward for the
/// `userId` of the ledger's last row.
pub fn locate_anchor(snapshot: &[Row], ledger: &Sheet) -> AnchorScan {
    let Some(last) = ledger.body().last() else {
        return AnchorScan::LedgerEmpty;
    };
    let anchor = last.get(COL_USER_ID).map(String::as_str).unwrap_or("");
    for i in (0..snapshot.len()).rev() {
        if snapshot[i].user_id == anchor {
            return AnchorScan::Found(i);
        }
    }
    AnchorScan::NotFound
}

/// Rows strictly newer than the anchor, ordered oldest-first so appending
/// keeps the ledger in ledger order. With no usable anchor the whole
/// snapshot counts as new.
pub fn rows_to_append<'a>(snapshot: &'a [Row], scan: AnchorScan) -> Vec<&'a Row> {
    let newer_than = match scan {
        AnchorScan::Found(i) => i,
        AnchorScan::NotFound | AnchorScan::LedgerEmpty => snapshot.len(),
    };
    (0..newer_than).rev().map(|i| &snapshot[i]).collect()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileOutcome {
    pub appended: usize,
    /// The ledger had rows but its last key was missing from the
    /// snapshot; the full snapshot was appended rather than dropped.
    pub anchor_missing: bool,
    /// Appended rows that kept their raw date because it did not parse.
    pub unparsed_dates: usize,
}

/// Merge a snapshot into the ledger, appending everything newer than the
/// last merged row. Dates are rewritten to the display form when they
/// parse; a date that does not parse is kept raw and counted.
pub fn reconcile(snapshot: &[Row], ledger: &mut Sheet) -> Result<ReconcileOutcome, EngineError> {
    if ledger.header().is_none() {
        return Err(EngineError::MissingHeader(ledger.name.clone()));
    }
    if snapshot.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    let scan = locate_anchor(snapshot, ledger);
    let mut outcome = ReconcileOutcome {
        anchor_missing: scan == AnchorScan::NotFound,
        ..Default::default()
    };

    for row in rows_to_append(snapshot, scan) {
        let mut cells = row.to_cells();
        match parse_date(&cells[COL_DATE]) {
            Some(date) => cells[COL_DATE] = display_date(date),
            None => {
                if !cells[COL_DATE].is_empty() {
                    outcome.unparsed_dates += 1;
                }
            }
        }
        ledger.append_row(cells);
        outcome.appended += 1;
    }

    Ok(outcome)
}
