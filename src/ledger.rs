//! In-memory transaction ledger.
//!
//! Owns the immutable record set, ingests CSV input in streaming fashion and
//! answers view queries. Records are never modified once accepted.

use crate::error::{LedgerError, Result};
use crate::fees::FeeSchedule;
use crate::sample::sample_transactions;
use crate::transaction::{NewTransaction, TransactionRecord};
use crate::view::{visible_set, Clock, ViewParams};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// Outcome of a CSV load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Rows turned into records
    pub accepted: usize,
    /// Rows excluded as malformed or duplicate
    pub skipped: usize,
}

/// The transaction ledger.
///
/// # Invariants
///
/// - Every record id is unique
/// - Records keep their insertion order; views sort their own copy of
///   references
pub struct Ledger {
    records: Vec<TransactionRecord>,

    /// Position of each record in `records`, keyed by id.
    index: HashMap<String, usize>,

    fees: FeeSchedule,
}

impl Ledger {
    /// Creates an empty ledger deriving fees from `fees`.
    pub fn new(fees: FeeSchedule) -> Self {
        Ledger {
            records: Vec::new(),
            index: HashMap::new(),
            fees,
        }
    }

    /// Creates a ledger holding the deterministic sample set.
    pub fn with_sample(fees: FeeSchedule) -> Self {
        let mut ledger = Ledger::new(fees);
        for row in sample_transactions() {
            if let Err(e) = ledger.insert(row) {
                warn!("Sample row rejected: {}", e);
            }
        }
        info!("Loaded {} sample transactions", ledger.len());
        ledger
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TransactionRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Validates a row, derives its fees and appends it.
    pub fn insert(&mut self, row: NewTransaction) -> Result<&TransactionRecord> {
        let record = row.into_record(&self.fees)?;

        if self.index.contains_key(record.id()) {
            return Err(LedgerError::DuplicateId {
                id: record.id().to_string(),
            });
        }

        let pos = self.records.len();
        self.index.insert(record.id().to_string(), pos);
        self.records.push(record);
        Ok(&self.records[pos])
    }

    /// Loads transactions from a CSV reader.
    ///
    /// Malformed rows and duplicate ids are logged at warn level and skipped;
    /// they never abort the load. Only a failure to read the header is fatal.
    pub fn load_csv<R: Read>(&mut self, reader: R) -> Result<LoadReport> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        csv_reader.headers()?;

        let mut report = LoadReport::default();

        for (row_idx, result) in csv_reader.deserialize::<NewTransaction>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(row) => match self.insert(row) {
                    Ok(record) => {
                        debug!("Row {}: Accepted transaction {}", row_num, record.id());
                        report.accepted += 1;
                    }
                    Err(e) => {
                        warn!("Row {}: {}", row_num, e);
                        report.skipped += 1;
                    }
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} transactions, skipped {} rows",
            report.accepted, report.skipped
        );
        Ok(report)
    }

    /// Distinct store labels in first-seen order.
    pub fn store_options(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(TransactionRecord::store)
            .filter(|store| seen.insert(*store))
            .collect()
    }

    /// Evaluates a view over the whole ledger.
    ///
    /// Fails with [`LedgerError::DataUnavailable`] when the ledger holds no
    /// records; a view that filters everything out is an empty list.
    pub fn view(&self, params: &ViewParams, clock: &Clock) -> Result<Vec<&TransactionRecord>> {
        if self.is_empty() {
            return Err(LedgerError::DataUnavailable);
        }
        Ok(visible_set(&self.records, params, clock))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(FeeSchedule::default())
    }
}
