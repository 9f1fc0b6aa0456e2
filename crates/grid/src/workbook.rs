use std::collections::HashSet;
use std::path::Path;

use crate::sheet::{valid_sheet_name, Sheet};
use crate::GridError;

/// A workbook: ordered named sheets, persisted as `<name>.csv` files in a
/// single directory. The whole workbook is loaded into memory at open and
/// written back on save; callers serialize runs externally.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    /// Load every `*.csv` in `dir` as a sheet (file stem = sheet name),
    /// in lexical order so repeated opens are deterministic.
    pub fn open(dir: &Path) -> Result<Self, GridError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            GridError::Io(format!("cannot open workbook {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let mut sheets = Vec::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            sheets.push(read_sheet(name, &path)?);
        }

        Ok(Self { sheets })
    }

    /// Create the workbook directory. Fails if it already holds sheets.
    pub fn create(dir: &Path) -> Result<Self, GridError> {
        if dir.exists() {
            let has_sheets = std::fs::read_dir(dir)
                .map_err(|e| GridError::Io(format!("cannot read {}: {}", dir.display(), e)))?
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|ext| ext == "csv"));
            if has_sheets {
                return Err(GridError::Io(format!(
                    "workbook already exists at {}",
                    dir.display(),
                )));
            }
        }
        std::fs::create_dir_all(dir).map_err(|e| {
            GridError::Io(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self::new())
    }

    /// Write every sheet back to `dir` as CSV.
    pub fn save(&self, dir: &Path) -> Result<(), GridError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            GridError::Io(format!("cannot create {}: {}", dir.display(), e))
        })?;
        for sheet in &self.sheets {
            write_sheet(sheet, &dir.join(format!("{}.csv", sheet.name)))?;
        }
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet_exists(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    /// Named-sheet lookup. A missing sheet is a configuration error for
    /// every run, so this returns `Err` rather than `Option`.
    pub fn sheet(&self, name: &str) -> Result<&Sheet, GridError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| GridError::SheetNotFound(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet, GridError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| GridError::SheetNotFound(name.to_string()))
    }

    /// Add an empty sheet. Fails on duplicate or unusable names.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Sheet, GridError> {
        let existing: HashSet<String> =
            self.sheets.iter().map(|s| s.name.clone()).collect();
        valid_sheet_name(name, &existing).map_err(GridError::Io)?;
        self.sheets.push(Sheet::new(name));
        Ok(self.sheets.last_mut().unwrap())
    }
}

fn read_sheet(name: &str, path: &Path) -> Result<Sheet, GridError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        GridError::Io(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| GridError::Csv(e.to_string()))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(Sheet::from_rows(name, rows))
}

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), GridError> {
    let file = std::fs::File::create(path).map_err(|e| {
        GridError::Io(format!("cannot create {}: {}", path.display(), e))
    })?;

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(std::io::BufWriter::new(file));

    for row in sheet.rows() {
        writer
            .write_record(row)
            .map_err(|e| GridError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|e| GridError::Csv(e.to_string()))?;
    Ok(())
}
