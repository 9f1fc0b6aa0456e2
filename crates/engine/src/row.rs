use chrono::NaiveDate;

/// Column order shared by the staging sheet, the ledger, and every
/// output view.
pub const HEADER: [&str; 6] = ["email", "userId", "sku", "status", "discount", "date"];

/// Identity column for anchor scans and dedup.
pub const COL_USER_ID: usize = 1;
/// Recency column.
pub const COL_DATE: usize = 5;

/// The display format dates are rewritten to when a row enters the ledger.
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// One transaction. Identity is `user_id`; recency is `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub email: String,
    pub user_id: String,
    pub sku: String,
    pub status: String,
    pub discount: String,
    pub date: String,
}

impl Row {
    /// Build a row from sheet cells, padding short rows with "" and
    /// ignoring cells beyond the schema.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            email: cell(0),
            user_id: cell(1),
            sku: cell(2),
            status: cell(3),
            discount: cell(4),
            date: cell(5),
        }
    }

    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.user_id.clone(),
            self.sku.clone(),
            self.status.clone(),
            self.discount.clone(),
            self.date.clone(),
        ]
    }

    pub fn header_cells() -> Vec<String> {
        HEADER.iter().map(|h| h.to_string()).collect()
    }

    /// Field by column index, in `HEADER` order. Out-of-range is "".
    pub fn field(&self, col: usize) -> &str {
        match col {
            0 => &self.email,
            1 => &self.user_id,
            2 => &self.sku,
            3 => &self.status,
            4 => &self.discount,
            5 => &self.date,
            _ => "",
        }
    }
}

/// Parse whatever date form a row carries: the ledger's own `DD/MM/YYYY`
/// display form, plain `YYYY-MM-DD`, or a timestamp (date part taken).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DISPLAY_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(stamp.date());
    }
    None
}

/// `DD/MM/YYYY`, the ledger display form.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}
