//! Generation history
//!
//! The ledger is append-only and hands records back most recent first.
//! Sequence numbers come from the ledger, not the provider, and resume from
//! the highest stored one when a ledger is opened over existing history.

use std::sync::Arc;

use parking_lot::Mutex;

use foundry_config::Config;
use foundry_schema::Variant;

use crate::error::ServiceError;
use crate::services::HistoryProvider;
use crate::types::{AssetRecord, RecordId, ResultDescriptor};

/// Append-only record of generated assets
#[derive(Clone)]
pub struct HistoryLedger {
    provider: Arc<dyn HistoryProvider>,
    next_sequence: Arc<Mutex<u64>>,
}

impl std::fmt::Debug for HistoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLedger")
            .field("next_sequence", &*self.next_sequence.lock())
            .finish_non_exhaustive()
    }
}

impl HistoryLedger {
    /// Open a ledger over `provider`, resuming its sequence
    ///
    /// # Errors
    /// Returns the provider's error if listing existing records fails.
    pub async fn open(provider: Arc<dyn HistoryProvider>) -> Result<Self, ServiceError> {
        let existing = provider.list().await?;
        let next = existing
            .iter()
            .map(AssetRecord::sequence)
            .max()
            .map_or(1, |max| max + 1);
        tracing::debug!(records = existing.len(), next, "history ledger opened");
        Ok(Self {
            provider,
            next_sequence: Arc::new(Mutex::new(next)),
        })
    }

    /// Ledger over a fresh in-memory store
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            provider: Arc::new(InMemoryHistory::new()),
            next_sequence: Arc::new(Mutex::new(1)),
        }
    }

    /// Record a generated asset
    ///
    /// # Errors
    /// Returns the provider's error if the record could not be stored. The
    /// sequence number is consumed either way.
    pub async fn append(
        &self,
        variant: Variant,
        config: Config,
        result: ResultDescriptor,
    ) -> Result<AssetRecord, ServiceError> {
        let sequence = {
            let mut next = self.next_sequence.lock();
            let sequence = *next;
            *next += 1;
            sequence
        };
        let record = AssetRecord::new(sequence, variant, config, result);
        self.provider.append(&record).await?;
        tracing::info!(
            id = %record.id(),
            sequence,
            %variant,
            fingerprint = %record.fingerprint().short(),
            "history record appended"
        );
        Ok(record)
    }

    /// All records, most recent first
    ///
    /// # Errors
    /// Returns the provider's error if listing fails.
    pub async fn list(&self) -> Result<Vec<AssetRecord>, ServiceError> {
        let mut records = self.provider.list().await?;
        records.sort_by(|a, b| b.sequence().cmp(&a.sequence()));
        Ok(records)
    }

    /// Record with `id`, if stored
    ///
    /// # Errors
    /// Returns the provider's error if listing fails.
    pub async fn get(&self, id: RecordId) -> Result<Option<AssetRecord>, ServiceError> {
        Ok(self
            .provider
            .list()
            .await?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Most recent record
    ///
    /// # Errors
    /// Returns the provider's error if listing fails.
    pub async fn latest(&self) -> Result<Option<AssetRecord>, ServiceError> {
        Ok(self
            .provider
            .list()
            .await?
            .into_iter()
            .max_by_key(AssetRecord::sequence))
    }

    /// Delete a record; `false` if it was not stored
    ///
    /// # Errors
    /// Returns the provider's error if removal fails.
    pub async fn remove(&self, id: RecordId) -> Result<bool, ServiceError> {
        let removed = self.provider.remove(id).await?;
        if removed {
            tracing::info!(%id, "history record removed");
        }
        Ok(removed)
    }
}

/// History kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<AssetRecord>>,
}

impl InMemoryHistory {
    /// Create empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create pre-populated history
    #[must_use]
    pub fn with_records(records: Vec<AssetRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl HistoryProvider for InMemoryHistory {
    async fn list(&self) -> Result<Vec<AssetRecord>, ServiceError> {
        Ok(self.records.lock().clone())
    }

    async fn append(&self, record: &AssetRecord) -> Result<(), ServiceError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    async fn remove(&self, id: RecordId) -> Result<bool, ServiceError> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}
