use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// A ledger or view sheet has no header row to append under.
    MissingHeader(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader(sheet) => write!(f, "sheet '{sheet}' has no header row"),
        }
    }
}

impl std::error::Error for EngineError {}
