use std::collections::HashSet;

/// A named grid of string cells. Row 0 is the header for ledger and view
/// sheets; staging sheets carry no header and start at row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The header row, if the sheet has any rows at all.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// All rows below the header. Empty for a header-only or empty sheet.
    pub fn body(&self) -> &[Vec<String>] {
        if self.rows.len() <= 1 {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    /// One column of the body, padding short rows with "".
    pub fn body_column(&self, col: usize) -> Vec<String> {
        self.body()
            .iter()
            .map(|r| r.get(col).cloned().unwrap_or_default())
            .collect()
    }

    /// Cell value at (row, col), or "" when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of rows, header included.
    pub fn last_row(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn last_col(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Replace everything below the header in one bulk write. The header
    /// stays; an empty `rows` clears the sheet down to header-only.
    pub fn write_body(&mut self, rows: Vec<Vec<String>>) {
        self.rows.truncate(1);
        self.rows.extend(rows);
    }

    /// Replace the entire sheet contents, header included.
    pub fn replace_all(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
    }

    pub fn clear_all(&mut self) {
        self.rows.clear();
    }
}

/// Reject sheet names that would collide or escape the workbook directory
/// when used as a file stem.
pub(crate) fn valid_sheet_name(name: &str, existing: &HashSet<String>) -> Result<(), String> {
    if name.is_empty() {
        return Err("sheet name is empty".into());
    }
    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(format!("invalid sheet name: {name:?}"));
    }
    if existing.contains(name) {
        return Err(format!("sheet already exists: {name}"));
    }
    Ok(())
}
