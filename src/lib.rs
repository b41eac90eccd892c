#![doc(test(attr(deny(warnings))))]

//! Allowance Core keeps a personal allowance/expense ledger: validated, dated,
//! signed amounts with a memo, persisted as plain text, with a running total.
//!
//! UIs talk to [`core::LedgerSession`]; storage backends implement
//! [`storage::StorageBackend`].

pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{EditDraft, LedgerSession, RowView};
pub use errors::{LedgerError, Result, ValidationError};
pub use ledger::{Record, SignState, Total};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Allowance Core tracing initialized.");
    });
}
