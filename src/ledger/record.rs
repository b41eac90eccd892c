use serde::Serialize;

use crate::errors::ValidationError;

use super::validation;

/// One ledger entry: a date, a signed amount, and a free-text memo.
///
/// Records are built either through [`Record::parse`], which runs the
/// validation rules, or by decoding a persisted line. Decoded records keep
/// their text as found on disk, so `amount` may not be numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    date: String,
    amount: String,
    memo: String,
}

impl Record {
    /// Validates raw user input and returns the normalized record.
    pub fn parse(date: &str, amount: &str, memo: &str) -> Result<Self, ValidationError> {
        validation::validate(date, amount, memo)
    }

    pub(crate) fn from_parts(
        date: impl Into<String>,
        amount: impl Into<String>,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            memo: memo.into(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// The amount exactly as stored.
    pub fn amount_text(&self) -> &str {
        &self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Replaces line breaks in the memo with spaces and reports whether any
    /// were found. The text format has no escaping, so a break would split the
    /// record on reload.
    pub(crate) fn flatten_memo(&mut self) -> bool {
        if !self.memo.contains(['\r', '\n']) {
            return false;
        }
        self.memo = self.memo.replace("\r\n", " ").replace(['\r', '\n'], " ");
        true
    }

    /// Numeric amount, or `None` when the stored text is not a well-formed
    /// signed integer.
    pub fn amount(&self) -> Option<i64> {
        if !validation::is_signed_integer(&self.amount) {
            return None;
        }
        self.amount.parse().ok()
    }
}
