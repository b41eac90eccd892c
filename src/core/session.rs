use std::{fmt::Write as _, path::Path};

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, ConfigManager},
    errors::{LedgerError, Result},
    ledger::{LedgerStore, Record, SelectionState, SignState, Total, TotalAggregator},
    storage::{self, StorageBackend},
};

/// Raw field values of the selected record, for pre-filling an edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDraft {
    pub date: String,
    pub amount: String,
    pub memo: String,
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub index: usize,
    pub date: String,
    pub amount: String,
    pub memo: String,
    pub sign_state: SignState,
    pub selected: bool,
    pub marked: bool,
}

/// Entry point for a UI: owns the ledger and the selection, and exposes every
/// operation the UI may trigger. Each call runs to completion before it
/// returns; a failed call leaves the ledger as it was.
#[derive(Debug)]
pub struct LedgerSession {
    store: LedgerStore,
    selection: SelectionState,
    date_format: String,
}

impl LedgerSession {
    pub fn new(storage: Box<dyn StorageBackend>, config: &Config) -> Result<Self> {
        let aggregator = TotalAggregator::new(
            config.currency.clone(),
            config.locale.clone(),
            config.format,
        );
        let store = LedgerStore::open(storage, aggregator, config.malformed_lines)?;
        Ok(Self {
            store,
            selection: SelectionState::new(),
            date_format: config.date_format.clone(),
        })
    }

    /// Opens the backend configured in `config` under `base`.
    pub fn open(config: &Config, base: &Path) -> Result<Self> {
        let backend = storage::open_backend(config, base)?;
        Self::new(backend, config)
    }

    /// Reads the configuration from the default base directory and opens the
    /// ledger it points at.
    pub fn open_default() -> Result<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        info!(base = %manager.base_dir().display(), "opening allowance ledger");
        Self::open(&config, manager.base_dir())
    }

    pub fn submit_new(&mut self, date: &str, amount: &str, memo: &str) -> Result<()> {
        let record = Record::parse(date, amount, memo)?;
        self.store.insert_front(record)?;
        self.selection.shift_for_insert();
        Ok(())
    }

    pub fn submit_update(
        &mut self,
        index: usize,
        date: &str,
        amount: &str,
        memo: &str,
    ) -> Result<()> {
        let record = Record::parse(date, amount, memo)?;
        self.store.update_at(index, record)
    }

    /// Saves the form over the currently selected record.
    pub fn submit_selected(&mut self, date: &str, amount: &str, memo: &str) -> Result<()> {
        let index = self.selection.selected().ok_or(LedgerError::NoSelection)?;
        self.submit_update(index, date, amount, memo)
    }

    /// Removes every marked record and returns how many were removed.
    pub fn request_delete_marked(&mut self) -> Result<usize> {
        let selection = &self.selection;
        let removed = self
            .store
            .remove_marked(|index, _| selection.is_marked(index))?;
        self.selection.compact_after_removal();
        Ok(removed)
    }

    /// Replaces the whole ledger; selection and marks are reset.
    pub fn overwrite(&mut self, records: Vec<Record>) -> Result<()> {
        self.store.overwrite(records)?;
        self.selection = SelectionState::new();
        Ok(())
    }

    pub fn get_snapshot(&self) -> Vec<Record> {
        self.store.all().to_vec()
    }

    pub fn get_total_display(&self) -> Total {
        self.store.total().clone()
    }

    pub fn rows(&self) -> Vec<RowView> {
        let aggregator = self.store.aggregator();
        self.store
            .all()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let (amount, sign_state) = match record.amount() {
                    Some(value) => (aggregator.format_amount(value), SignState::of(value)),
                    None => (record.amount_text().to_string(), SignState::NonNegative),
                };
                RowView {
                    index,
                    date: record.date().to_string(),
                    amount,
                    memo: record.memo().to_string(),
                    sign_state,
                    selected: self.selection.is_selected(index),
                    marked: self.selection.is_marked(index),
                }
            })
            .collect()
    }

    /// Selects `index` for editing and returns its fields.
    pub fn select(&mut self, index: usize) -> Result<EditDraft> {
        self.ensure_index(index)?;
        self.selection.select(index);
        debug!(index, "record selected");
        self.edit_draft()
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.store.len(),
            })
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    /// Selected index, or `-1` when nothing is selected.
    pub fn selected_sentinel(&self) -> i64 {
        self.selection.selected_sentinel()
    }

    /// Flips the deletion mark on `index`; returns whether it is now marked.
    pub fn toggle_mark(&mut self, index: usize) -> Result<bool> {
        self.ensure_index(index)?;
        Ok(self.selection.toggle_mark(index))
    }

    pub fn marked(&self) -> Vec<usize> {
        self.selection.marked().collect()
    }

    pub fn has_marked(&self) -> bool {
        self.selection.has_marked()
    }

    pub fn can_save(&self) -> bool {
        self.selection
            .selected()
            .is_some_and(|index| index < self.store.len())
    }

    pub fn edit_draft(&self) -> Option<EditDraft> {
        let record = self.store.get(self.selection.selected()?)?;
        Some(EditDraft {
            date: record.date().to_string(),
            amount: record.amount_text().to_string(),
            memo: record.memo().to_string(),
        })
    }

    /// Today's date in the configured format, for a new entry's date field.
    pub fn default_date(&self) -> String {
        let today = Local::now().date_naive();
        let mut out = String::new();
        if write!(out, "{}", today.format(&self.date_format)).is_err() {
            warn!(format = %self.date_format, "invalid date format, using default");
            out = today.format(&Config::default_date_format()).to_string();
        }
        out
    }

    /// Lines dropped while loading the persisted ledger.
    pub fn load_warnings(&self) -> &[String] {
        self.store.load_warnings()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn ensure_index(&self, index: usize) -> Result<()> {
        let len = self.store.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}
