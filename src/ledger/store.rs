use tracing::{debug, info, warn};

use crate::{
    errors::{LedgerError, Result},
    storage::StorageBackend,
};

use super::{
    codec::{self, MalformedLinePolicy},
    Record, Total, TotalAggregator,
};

/// Ordered, persisted collection of records. Index 0 is the newest entry.
///
/// Every mutation runs as one step: change the in-memory sequence, write the
/// full serialization to the backend, recompute the total. If the write fails
/// the sequence is restored and the error returned, so memory never runs
/// ahead of storage.
pub struct LedgerStore {
    records: Vec<Record>,
    total: Total,
    aggregator: TotalAggregator,
    storage: Box<dyn StorageBackend>,
    load_warnings: Vec<String>,
}

impl LedgerStore {
    /// Loads the persisted blob once. An empty or missing blob is an empty
    /// ledger.
    pub fn open(
        storage: Box<dyn StorageBackend>,
        aggregator: TotalAggregator,
        policy: MalformedLinePolicy,
    ) -> Result<Self> {
        let blob = storage.load()?;
        let report = codec::decode_ledger(&blob, policy)?;
        info!(
            backend = %storage.describe(),
            records = report.records.len(),
            skipped = report.warnings.len(),
            "ledger loaded"
        );
        let total = aggregator.recompute(&report.records);
        Ok(Self {
            records: report.records,
            total,
            aggregator,
            storage,
            load_warnings: report.warnings,
        })
    }

    /// Read-only snapshot in display order.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> &Total {
        &self.total
    }

    pub fn aggregator(&self) -> &TotalAggregator {
        &self.aggregator
    }

    /// Lines dropped while loading.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn insert_front(&mut self, record: Record) -> Result<()> {
        debug!(date = record.date(), amount = record.amount_text(), "insert record");
        self.transact(|records| {
            records.insert(0, record);
            Ok(())
        })
    }

    pub fn update_at(&mut self, index: usize, record: Record) -> Result<()> {
        let len = self.records.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        debug!(index, date = record.date(), amount = record.amount_text(), "update record");
        self.transact(|records| {
            records[index] = record;
            Ok(())
        })
    }

    /// Removes every record for which `marked(index, record)` is true, keeping
    /// the relative order of the rest. Returns how many were removed; storage
    /// is not touched when nothing matches.
    pub fn remove_marked<F>(&mut self, mut marked: F) -> Result<usize>
    where
        F: FnMut(usize, &Record) -> bool,
    {
        let doomed: Vec<bool> = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| marked(index, record))
            .collect();
        let removed = doomed.iter().filter(|hit| **hit).count();
        if removed == 0 {
            return Ok(0);
        }
        self.transact(|records| {
            let mut flags = doomed.into_iter();
            records.retain(|_| !flags.next().unwrap_or(false));
            Ok(())
        })?;
        debug!(removed, remaining = self.records.len(), "removed marked records");
        Ok(removed)
    }

    /// Replaces the whole ledger.
    pub fn overwrite(&mut self, records: Vec<Record>) -> Result<()> {
        debug!(records = records.len(), "overwrite ledger");
        self.transact(|current| {
            *current = records;
            Ok(())
        })
    }

    fn transact<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Record>) -> Result<()>,
    {
        let snapshot = self.records.clone();
        mutate(&mut self.records)?;
        for (index, record) in self.records.iter_mut().enumerate() {
            if record.flatten_memo() {
                warn!(index, "replaced line breaks in memo");
            }
        }
        let blob = codec::encode_ledger(&self.records);
        if let Err(err) = self.storage.save(&blob) {
            warn!(error = %err, backend = %self.storage.describe(), "save failed, rolling back");
            self.records = snapshot;
            return Err(err);
        }
        self.total = self.aggregator.recompute(&self.records);
        Ok(())
    }
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("records", &self.records)
            .field("total", &self.total)
            .field("storage", &self.storage.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::SignState, storage::MemoryStorage};
    use std::sync::Arc;

    fn store_with(blob: &str) -> (LedgerStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::with_blob(blob));
        let store = LedgerStore::open(
            Box::new(backend.clone()),
            TotalAggregator::default(),
            MalformedLinePolicy::Skip,
        )
        .unwrap();
        (store, backend)
    }

    fn record(amount: &str) -> Record {
        Record::parse("2024/04/01", amount, "memo").unwrap()
    }

    #[test]
    fn insert_front_prepends_and_persists() {
        let (mut store, backend) = store_with("");
        for amount in ["100", "-30", "5"] {
            store.insert_front(record(amount)).unwrap();
        }
        let amounts: Vec<_> = store.all().iter().map(Record::amount_text).collect();
        assert_eq!(amounts, ["5", "-30", "100"]);
        assert_eq!(store.total().total, 75);
        assert_eq!(store.total().sign_state, SignState::NonNegative);
        assert_eq!(
            backend.load().unwrap(),
            "2024/04/01,5,memo\n2024/04/01,-30,memo\n2024/04/01,100,memo"
        );
    }

    #[test]
    fn update_out_of_range_changes_nothing() {
        let (mut store, backend) = store_with("1/1,10,a");
        let before = backend.load().unwrap();
        let err = store.update_at(1, record("99")).unwrap_err();
        assert!(matches!(err, LedgerError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(backend.load().unwrap(), before);
        assert_eq!(backend.save_count(), 0);
        assert_eq!(store.total().total, 10);
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut store, backend) = store_with("1/2,20,b\n1/1,10,a");
        store.update_at(1, record("-40")).unwrap();
        assert_eq!(store.get(1).unwrap().amount(), Some(-40));
        assert_eq!(store.total().total, -20);
        assert_eq!(backend.load().unwrap(), "1/2,20,b\n2024/04/01,-40,memo");
    }

    #[test]
    fn remove_marked_keeps_relative_order() {
        let (mut store, backend) = store_with("d,1,a\nd,2,b\nd,3,c\nd,4,d\nd,5,e");
        let removed = store.remove_marked(|index, _| index == 1 || index == 3).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(backend.load().unwrap(), "d,1,a\nd,3,c\nd,5,e");
        assert_eq!(store.total().total, 9);
    }

    #[test]
    fn remove_marked_without_matches_skips_save() {
        let (mut store, backend) = store_with("d,1,a\nd,2,b");
        let removed = store.remove_marked(|_, _| false).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(backend.save_count(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn every_write_keeps_records_on_one_line() {
        let (mut store, backend) = store_with("");
        let multi_line = Record::parse("2024/1/1", "10", "two\nlines").unwrap();
        store.overwrite(vec![multi_line.clone()]).unwrap();
        store.insert_front(multi_line.clone()).unwrap();
        store.update_at(1, multi_line).unwrap();
        assert_eq!(
            backend.load().unwrap(),
            "2024/1/1,10,two lines\n2024/1/1,10,two lines"
        );
        assert_eq!(store.get(0).unwrap().memo(), "two lines");

        let reopened = LedgerStore::open(
            Box::new(backend.clone()),
            TotalAggregator::default(),
            MalformedLinePolicy::Skip,
        )
        .unwrap();
        assert_eq!(reopened.len(), 2);
        assert!(reopened.load_warnings().is_empty());
    }

    #[test]
    fn failed_save_rolls_back() {
        let (mut store, backend) = store_with("1/1,10,a");
        backend.fail_next_save();
        let err = store.insert_front(record("5")).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total().total, 10);
        assert_eq!(backend.load().unwrap(), "1/1,10,a");
    }

    #[test]
    fn malformed_lines_are_dropped_on_next_save() {
        let (mut store, backend) = store_with("1/1,10,a\nbroken\n1/2,x,b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.load_warnings().len(), 1);
        assert_eq!(store.total().total, 10);
        assert_eq!(store.total().skipped, 1);
        let kept = store.all().to_vec();
        store.overwrite(kept).unwrap();
        assert_eq!(backend.load().unwrap(), "1/1,10,a\n1/2,x,b");
    }

    #[test]
    fn abort_policy_fails_open() {
        let backend = MemoryStorage::with_blob("1/1,10,a\nbroken");
        let err = LedgerStore::open(
            Box::new(backend),
            TotalAggregator::default(),
            MalformedLinePolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { .. }));
    }
}
