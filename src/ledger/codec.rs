//! Line-oriented text format for records and whole ledgers.
//!
//! Each record is one `date,amount,memo` line, split at most three ways so
//! the memo may contain commas. There is no header, version tag, or escaping.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{LedgerError, Result};

use super::Record;

pub const DELIMITER: char = ',';
pub const FIELD_COUNT: usize = 3;

/// What to do with a persisted line that does not split into three fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Drop the line and report it in [`LoadReport::warnings`].
    #[default]
    Skip,
    /// Fail the whole load with [`LedgerError::MalformedRecord`].
    Abort,
}

/// Records recovered from a blob, plus any lines that were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub warnings: Vec<String>,
}

pub fn encode(record: &Record) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        record.date(),
        record.amount_text(),
        record.memo()
    )
}

/// Splits a line into a record without re-validating its fields.
pub fn decode(line: &str) -> Result<Record> {
    let parts: Vec<&str> = line.splitn(FIELD_COUNT, DELIMITER).collect();
    match parts.as_slice() {
        [date, amount, memo] => Ok(Record::from_parts(*date, *amount, *memo)),
        _ => Err(LedgerError::MalformedRecord {
            content: line.to_string(),
            fields: parts.len(),
        }),
    }
}

/// Newline-joined encoding of every record; an empty ledger is `""`.
pub fn encode_ledger(records: &[Record]) -> String {
    records.iter().map(encode).collect::<Vec<_>>().join("\n")
}

pub fn decode_ledger(blob: &str, policy: MalformedLinePolicy) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for (idx, line) in blob.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line) {
            Ok(record) => report.records.push(record),
            Err(err) if policy == MalformedLinePolicy::Skip => {
                warn!(line = idx + 1, error = %err, "skipping malformed ledger line");
                report
                    .warnings
                    .push(format!("line {}: {}", idx + 1, err));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}
