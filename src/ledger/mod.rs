//! Ledger record model, text codec, validation, totals, and the persisted store.

pub mod codec;
pub mod record;
pub mod selection;
pub mod store;
pub mod total;
pub mod validation;

pub use codec::{LoadReport, MalformedLinePolicy};
pub use record::Record;
pub use selection::{SelectionState, NO_SELECTION};
pub use store::LedgerStore;
pub use total::{SignState, Total, TotalAggregator};
