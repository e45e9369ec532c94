use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use snip_core::error::{Result, StorageError};
use snip_core::repository::{Lookup, ReadRepository, Repository};
use snip_core::{EventRecorder, Level, LogEvent, NoopRecorder, Package, ShortCode, UrlRecord};
use std::sync::Arc;
use tracing::{debug, trace};

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so `insert` is a single check-and-set on the
/// entry and `update_if_live` holds the key's write lock for the whole
/// expiry check and update. Records are never evicted.
#[derive(Clone)]
pub struct InMemoryRepository {
    storage: Arc<DashMap<String, UrlRecord>>,
    recorder: Arc<dyn EventRecorder>,
}

impl InMemoryRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::with_recorder(Arc::new(NoopRecorder))
    }

    /// Creates an empty repository that reports domain events to `recorder`.
    pub fn with_recorder(recorder: Arc<dyn EventRecorder>) -> Self {
        Self {
            storage: Arc::new(DashMap::new()),
            recorder,
        }
    }

    /// Number of stored records, live or expired.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn emit(&self, level: Level, message: String) {
        self.recorder
            .record(LogEvent::backend(level, Package::Domain, message));
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("len", &self.storage.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let record = self.storage.get(code.as_str()).map(|r| r.value().clone());

        match &record {
            Some(_) => {
                trace!(code = %code, "retrieved record");
                self.emit(
                    Level::Debug,
                    format!("Retrieved URL data for shortcode: {code}"),
                );
            }
            None => {
                trace!(code = %code, "record not found");
                self.emit(
                    Level::Warn,
                    format!("Attempted to retrieve non-existent shortcode: {code}"),
                );
            }
        }

        Ok(record)
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = self.storage.contains_key(code.as_str());
        self.emit(
            Level::Debug,
            format!(
                "Checking existence of shortcode: {code} - {}",
                if exists { "exists" } else { "not found" }
            ),
        );
        Ok(exists)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let code = record.shortcode().clone();
        let target_url = record.target_url().to_owned();

        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }

        self.emit(
            Level::Info,
            format!("Creating URL mapping: {code} -> {target_url}"),
        );

        // The entry guard is gone by now; `len` takes every shard lock.
        let total = self.storage.len();
        debug!(code = %code, total, "stored record");
        self.emit(
            Level::Debug,
            format!("URL stored in memory. Total URLs: {total}"),
        );
        Ok(())
    }

    async fn update_if_live(
        &self,
        code: &ShortCode,
        now: Timestamp,
        update: &(dyn for<'a> Fn(&'a mut UrlRecord) + Send + Sync),
    ) -> Result<Lookup> {
        let lookup = match self.storage.get_mut(code.as_str()) {
            None => Lookup::Missing,
            Some(record) if record.is_expired_at(now) => Lookup::Expired,
            Some(mut record) => {
                update(record.value_mut());
                Lookup::Live(record.value().clone())
            }
        };

        match lookup {
            Lookup::Missing => self.emit(
                Level::Warn,
                format!("Attempted to retrieve non-existent shortcode: {code}"),
            ),
            Lookup::Expired => self.emit(
                Level::Warn,
                format!("URL with shortcode {code} has expired"),
            ),
            Lookup::Live(_) => self.emit(
                Level::Debug,
                format!("Retrieved URL data for shortcode: {code}"),
            ),
        }

        Ok(lookup)
    }
}
