//! Full reconcile → track → report lifecycle over in-memory sheets,
//! spanning several sync runs with overlapping pages.

use chrono::NaiveDate;
use tally_engine::{reconcile, report, track_by_marker, Row, COL_DATE, COL_USER_ID};
use tally_grid::Sheet;

fn row(user: &str, discount: &str, date: &str) -> Row {
    Row {
        email: format!("{user}@example.com"),
        user_id: user.to_string(),
        sku: format!("sku-{user}"),
        status: "paid".to_string(),
        discount: discount.to_string(),
        date: date.to_string(),
    }
}

fn headered(name: &str) -> Sheet {
    Sheet::from_rows(name, vec![Row::header_cells()])
}

fn users(sheet: &Sheet) -> Vec<String> {
    sheet.body().iter().map(|r| r[COL_USER_ID].clone()).collect()
}

#[test]
fn overlapping_pages_accumulate_without_loss_or_duplication() {
    let mut ledger = headered("Transactions");

    // First run: nothing merged yet, the whole page lands oldest-first.
    let page1 = vec![
        row("u3", "WELCOME", "2026-03-03"),
        row("u2", "SAVE10", "2026-03-02"),
        row("u1", "", "2026-03-01"),
    ];
    let outcome = reconcile(&page1, &mut ledger).unwrap();
    assert_eq!(outcome.appended, 3);
    assert_eq!(users(&ledger), vec!["u1", "u2", "u3"]);
    assert_eq!(ledger.body()[0][COL_DATE], "01/03/2026");

    // Same page again: anchor sits at the newest position, nothing new.
    let outcome = reconcile(&page1, &mut ledger).unwrap();
    assert_eq!(outcome.appended, 0);

    // Second run: two newer rows on top, the rest overlaps the ledger.
    let page2 = vec![
        row("u5", "WELCOME,SAVE10", "2026-03-05"),
        row("u4", "", "2026-03-04"),
        row("u3", "WELCOME", "2026-03-03"),
        row("u2", "SAVE10", "2026-03-02"),
    ];
    let outcome = reconcile(&page2, &mut ledger).unwrap();
    assert_eq!(outcome.appended, 2);
    assert!(!outcome.anchor_missing);
    assert_eq!(users(&ledger), vec!["u1", "u2", "u3", "u4", "u5"]);
}

#[test]
fn tracker_and_report_derive_from_the_same_ledger() {
    let mut ledger = headered("Transactions");
    let page = vec![
        row("u5", "WELCOME,SAVE10", "2026-03-09"),
        row("u4", "SAVE10", "2026-03-07"),
        row("u3", "WELCOME", "2026-03-03"),
        row("u2", "WELCOME", "2026-03-02"),
        row("u1", "", "2026-03-01"),
    ];
    reconcile(&page, &mut ledger).unwrap();

    let ledger_rows: Vec<Row> = ledger.body().iter().map(|c| Row::from_cells(c)).collect();

    // Tracker picks each WELCOME user once; a second pass adds nothing.
    let mut tracker = headered("Welcome_Tracker");
    assert_eq!(track_by_marker("WELCOME", &ledger_rows, &mut tracker).unwrap(), 3);
    assert_eq!(users(&tracker), vec!["u2", "u3", "u5"]);
    assert_eq!(track_by_marker("WELCOME", &ledger_rows, &mut tracker).unwrap(), 0);

    // Weekly report windows over the ledger's own display-form dates.
    let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let mut weekly = headered("Weekly_Report");
    let kept = report(|_| true, 7, today, &ledger_rows, &mut weekly).unwrap();
    assert_eq!(kept, 3);
    assert_eq!(users(&weekly), vec!["u3", "u4", "u5"]);

    // Narrower rerun replaces the body outright.
    let kept = report(|r| r.discount.contains("SAVE10"), 3, today, &ledger_rows, &mut weekly)
        .unwrap();
    assert_eq!(kept, 2);
    assert_eq!(users(&weekly), vec!["u4", "u5"]);
}

#[test]
fn aged_out_anchor_keeps_every_fetched_row() {
    let mut ledger = headered("Transactions");
    ledger.append_row(row("ancient", "", "01/01/2026").to_cells());

    let page = vec![
        row("u2", "", "2026-03-02"),
        row("u1", "", "2026-03-01"),
    ];
    let outcome = reconcile(&page, &mut ledger).unwrap();
    assert_eq!(outcome.appended, 2);
    assert!(outcome.anchor_missing);
    assert_eq!(users(&ledger), vec!["ancient", "u1", "u2"]);
}
