//! TOML run configuration. All tunables live here; there are no
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub store: StoreConfig,
    pub workbook: WorkbookConfig,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub project_id: String,
    pub collection: String,
    /// Page size for the bounded fetch.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Service-account JSON file.
    pub credentials: PathBuf,
    /// Endpoint override for tests and self-hosted emulators.
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkbookConfig {
    /// Workbook directory; one CSV file per sheet.
    pub path: PathBuf,
    #[serde(default = "default_staging_sheet")]
    pub staging_sheet: String,
    #[serde(default = "default_ledger_sheet")]
    pub ledger_sheet: String,
}

fn default_limit() -> u32 {
    100
}

fn default_staging_sheet() -> String {
    "Staging".into()
}

fn default_ledger_sheet() -> String {
    "Transactions".into()
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(input: &str) -> Result<Self, CliError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| CliError::config(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.store.project_id.is_empty() {
            return Err(CliError::config("store.project_id is empty"));
        }
        if self.store.collection.is_empty() {
            return Err(CliError::config("store.collection is empty"));
        }
        if self.store.limit == 0 {
            return Err(CliError::config("store.limit must be at least 1"));
        }
        if self.workbook.staging_sheet.is_empty() || self.workbook.ledger_sheet.is_empty() {
            return Err(CliError::config("workbook sheet names must not be empty"));
        }
        if self.workbook.staging_sheet == self.workbook.ledger_sheet {
            return Err(CliError::config(
                "workbook.staging_sheet and workbook.ledger_sheet must differ",
            ));
        }
        Ok(())
    }
}
