use thiserror::Error;

/// Field-level input failures reported by [`crate::ledger::validation`].
///
/// Variants are listed in the order the rules are checked; the first failing
/// rule wins.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date is required")]
    EmptyDate,
    #[error("date may be at most 10 characters")]
    DateTooLong,
    #[error("date may only contain digits and `/`")]
    DateInvalidChars,
    #[error("amount is required")]
    EmptyAmount,
    #[error("`-` is only allowed once, at the start of the amount")]
    AmountBadSign,
    #[error("amount must be a whole number")]
    AmountNotNumeric,
}

/// Error type that captures ledger, storage, and configuration failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Index {index} is out of range for a ledger of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No record is selected")]
    NoSelection,
    #[error("Malformed record `{content}`: expected 3 fields, found {fields}")]
    MalformedRecord { content: String, fields: usize },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// True for errors that are meant to be shown to the user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    /// The validation failure behind this error, if any.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            LedgerError::Validation(err) => Some(*err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
