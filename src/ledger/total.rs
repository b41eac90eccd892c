use serde::Serialize;
use tracing::warn;

use crate::currency::{format_currency_value, CurrencyCode, FormatOptions, LocaleConfig};

use super::Record;

/// Display state derived from the sign of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignState {
    Negative,
    NonNegative,
}

impl SignState {
    pub fn of(amount: i64) -> Self {
        if amount < 0 {
            SignState::Negative
        } else {
            SignState::NonNegative
        }
    }
}

/// Running total over a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Total {
    pub total: i64,
    pub sign_state: SignState,
    pub display: String,
    /// Records left out because their amount could not be summed.
    pub skipped: usize,
}

/// Recomputes [`Total`] with a fixed currency presentation.
#[derive(Debug, Clone, Default)]
pub struct TotalAggregator {
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
    pub format: FormatOptions,
}

impl TotalAggregator {
    pub fn new(currency: CurrencyCode, locale: LocaleConfig, format: FormatOptions) -> Self {
        Self {
            currency,
            locale,
            format,
        }
    }

    pub fn recompute(&self, records: &[Record]) -> Total {
        let mut total: i64 = 0;
        let mut skipped = 0;
        for (index, record) in records.iter().enumerate() {
            let Some(amount) = record.amount() else {
                warn!(index, amount = record.amount_text(), "excluding non-numeric amount from total");
                skipped += 1;
                continue;
            };
            match total.checked_add(amount) {
                Some(sum) => total = sum,
                None => {
                    warn!(index, amount, "excluding amount that would overflow the total");
                    skipped += 1;
                }
            }
        }
        Total {
            total,
            sign_state: SignState::of(total),
            display: self.format_amount(total),
            skipped,
        }
    }

    pub fn format_amount(&self, amount: i64) -> String {
        format_currency_value(amount, &self.currency, &self.locale, &self.format)
    }
}
