use std::collections::HashSet;

use tally_grid::Sheet;

use crate::error::EngineError;
use crate::row::{Row, COL_USER_ID};

/// Append ledger rows whose discount field contains `marker`, at most one
/// row per user across the life of the view. Substring containment is
/// deliberate: a discount cell may stack several codes.
pub fn track_by_marker(
    marker: &str,
    ledger_rows: &[Row],
    view: &mut Sheet,
) -> Result<usize, EngineError> {
    if view.header().is_none() {
        return Err(EngineError::MissingHeader(view.name.clone()));
    }

    // One consistent read of "already seen" before any append.
    let mut seen: HashSet<String> = view.body_column(COL_USER_ID).into_iter().collect();

    let mut appended = 0;
    for row in ledger_rows {
        if !row.discount.contains(marker) || seen.contains(&row.user_id) {
            continue;
        }
        seen.insert(row.user_id.clone());
        view.append_row(row.to_cells());
        appended += 1;
    }
    Ok(appended)
}
