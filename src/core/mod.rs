pub mod session;
pub mod utils;

pub use session::{EditDraft, LedgerSession, RowView};
