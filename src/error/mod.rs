use std::fmt;

/// Everything that can go wrong while loading or querying transactions.
/// Each variant carries the offending value or a short description of it.
/// All failures are deterministic data-quality issues; none are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    SourceNotFoundError(String),
    MalformedCsvError(String),
    MalformedDateError(String),
    MalformedAmountError(String),
    ProfileMismatchError(String),
    InvalidProfileError(String),
    UnknownFieldError(String),
    InvalidPatternError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::SourceNotFoundError(s) => write!(f, "source not found: {s}"),
            LedgerError::MalformedCsvError(s) => write!(f, "malformed csv: {s}"),
            LedgerError::MalformedDateError(s) => write!(f, "malformed date: '{s}'"),
            LedgerError::MalformedAmountError(s) => write!(f, "malformed amount: '{s}'"),
            LedgerError::ProfileMismatchError(s) => write!(f, "profile mismatch: {s}"),
            LedgerError::InvalidProfileError(s) => write!(f, "invalid profile: {s}"),
            LedgerError::UnknownFieldError(s) => write!(f, "unknown field: {s}"),
            LedgerError::InvalidPatternError(s) => write!(f, "invalid description pattern: {s}"),
        }
    }
}

impl std::error::Error for LedgerError {}
