//! `tally-engine` — the reconciliation and derived-view passes.
//!
//! Pure engine crate: receives pre-loaded rows and in-memory sheets,
//! returns counts. No HTTP or filesystem access.

pub mod dedup;
pub mod error;
pub mod reconcile;
pub mod row;
pub mod window;

pub use dedup::track_by_marker;
pub use error::EngineError;
pub use reconcile::{locate_anchor, reconcile, rows_to_append, AnchorScan, ReconcileOutcome};
pub use row::{display_date, parse_date, Row, COL_DATE, COL_USER_ID, HEADER};
pub use window::report;
