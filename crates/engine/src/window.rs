use chrono::{Duration, NaiveDate};
use tally_grid::Sheet;

use crate::error::EngineError;
use crate::row::{parse_date, Row};

/// Replace `view`'s body with the ledger rows dated within the last
/// `window_days` days (inclusive of the boundary) that satisfy
/// `predicate`. Rows whose date does not parse are excluded. Ledger
/// order is preserved; an empty result clears the view to header-only.
///
/// `today` is passed in rather than read from the clock so the boundary
/// is the caller's to pin down.
pub fn report(
    predicate: impl Fn(&Row) -> bool,
    window_days: i64,
    today: NaiveDate,
    ledger_rows: &[Row],
    view: &mut Sheet,
) -> Result<usize, EngineError> {
    if view.header().is_none() {
        return Err(EngineError::MissingHeader(view.name.clone()));
    }

    let start = today - Duration::days(window_days);
    let kept: Vec<Vec<String>> = ledger_rows
        .iter()
        .filter(|row| matches!(parse_date(&row.date), Some(date) if date >= start))
        .filter(|row| predicate(row))
        .map(|row| row.to_cells())
        .collect();

    let count = kept.len();
    view.write_body(kept);
    Ok(count)
}
