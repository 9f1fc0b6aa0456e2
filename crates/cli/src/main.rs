//! tally — pull remote transaction documents into a CSV-backed ledger,
//! with derived sheets for campaign trackers and windowed reports.

mod config;
mod exit_codes;
mod filter;
mod sheets;
mod sync;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{
    EXIT_CONFIG, EXIT_SHEET_NOT_FOUND, EXIT_STORE_AUTH, EXIT_STORE_NETWORK, EXIT_STORE_UPSTREAM,
    EXIT_SUCCESS, EXIT_USAGE, EXIT_WORKBOOK_IO,
};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Sync remote transaction documents into a CSV ledger")]
#[command(version)]
struct Cli {
    /// Run config file
    #[arg(long, global = true, default_value = "tally.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest page from the store and reconcile it into the ledger
    #[command(after_help = "\
The staging sheet is overwritten with the fetched page (newest first);
everything newer than the ledger's last merged row is then appended to
the ledger, oldest first.

Examples:
  tally sync
  tally sync --config prod.toml --json
  tally sync -q")]
    Sync {
        /// Print a JSON run summary to stdout
        #[arg(long)]
        json: bool,

        /// Suppress stderr progress
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Append ledger rows carrying a campaign marker, at most once per user
    #[command(after_help = "\
Examples:
  tally track --marker WELCOME --out Welcome_Tracker
  tally track --marker SAVE10 --out Save10_Tracker -q")]
    Track {
        /// Substring to look for in the discount column
        #[arg(long)]
        marker: String,

        /// Output sheet (create it first with `tally sheet-add`)
        #[arg(long)]
        out: String,

        /// Suppress stderr progress
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Replace an output sheet with ledger rows from the last N days
    #[command(after_help = "\
Filters AND together. Supported forms: field=value, field!=value,
field~substring. Fields: email, userId, sku, status, discount, date.

Examples:
  tally report --out Weekly_Report
  tally report --days 30 --where status=paid --out Monthly_Paid
  tally report --where 'discount~WELCOME' --out Welcome_Window")]
    Report {
        /// Window size in days, counted back from today (inclusive)
        #[arg(long, default_value_t = 7)]
        days: i64,

        /// Row filter expression (repeatable)
        #[arg(long = "where", value_name = "EXPR")]
        r#where: Vec<String>,

        /// Output sheet (create it first with `tally sheet-add`)
        #[arg(long)]
        out: String,

        /// Suppress stderr progress
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Create the workbook directory with the staging and ledger sheets
    Init {
        /// Suppress stderr progress
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Add an empty headered output sheet to the workbook
    SheetAdd {
        /// Sheet name
        name: String,

        /// Suppress stderr progress
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync { json, quiet } => sync::cmd_sync(&cli.config, json, quiet),
        Commands::Track { marker, out, quiet } => {
            sheets::cmd_track(&cli.config, &marker, &out, quiet)
        }
        Commands::Report { days, r#where, out, quiet } => {
            sheets::cmd_report(&cli.config, days, &r#where, &out, quiet)
        }
        Commands::Init { quiet } => sheets::cmd_init(&cli.config, quiet),
        Commands::SheetAdd { name, quiet } => sheets::cmd_sheet_add(&cli.config, &name, quiet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }
}

impl From<tally_grid::GridError> for CliError {
    fn from(err: tally_grid::GridError) -> Self {
        use tally_grid::GridError;
        let (code, hint) = match &err {
            GridError::SheetNotFound(_) => (
                EXIT_SHEET_NOT_FOUND,
                Some(
                    "run `tally init` to create the workbook, or `tally sheet-add` for output sheets"
                        .to_string(),
                ),
            ),
            GridError::Io(_) | GridError::Csv(_) => (EXIT_WORKBOOK_IO, None),
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<tally_store::StoreError> for CliError {
    fn from(err: tally_store::StoreError) -> Self {
        use tally_store::StoreError;
        let code = match &err {
            StoreError::Credentials(_) | StoreError::Auth(_) => EXIT_STORE_AUTH,
            StoreError::Http(_, _) | StoreError::Parse(_) => EXIT_STORE_UPSTREAM,
            StoreError::Network(_) => EXIT_STORE_NETWORK,
        };
        let hint = match &err {
            StoreError::Network(_) | StoreError::Http(_, _) => {
                Some("transient upstream failure; re-run the sync".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<tally_engine::EngineError> for CliError {
    fn from(err: tally_engine::EngineError) -> Self {
        Self {
            code: EXIT_CONFIG,
            message: err.to_string(),
            hint: Some(
                "the sheet needs a header row; `tally init` and `tally sheet-add` create one"
                    .to_string(),
            ),
        }
    }
}
