//! The complaint store.
//!
//! The whole complaint collection lives as one pretty-printed JSON array in a
//! single key-value slot. Every operation loads that array fresh; every
//! mutation rewrites it in full.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::complaint::{Complaint, ComplaintFilter, ComplaintStatus, NewComplaint};
use crate::error::{Error, Result};
use crate::ids::{IdGenerator, RandomIds};
use crate::storage::KeyValueStore;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT_KEY: &str = "complaintDB";

/// How many id candidates `add` tries before giving up.
const MAX_ID_ATTEMPTS: usize = 32;

/// Aggregate counts over the complaint collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    /// Number of complaints.
    pub total: usize,
    /// Complaints with status `registered`.
    pub registered: usize,
    /// Complaints with status `progress`.
    pub in_progress: usize,
    /// Complaints with status `resolved`.
    pub resolved: usize,
    /// Complaint count per `type` label.
    pub by_type: BTreeMap<String, usize>,
}

impl ComplaintStats {
    fn tally(complaints: &[Complaint]) -> Self {
        let mut stats = Self {
            total: complaints.len(),
            ..Self::default()
        };
        for complaint in complaints {
            match complaint.status {
                ComplaintStatus::Registered => stats.registered += 1,
                ComplaintStatus::Progress => stats.in_progress += 1,
                ComplaintStatus::Resolved => stats.resolved += 1,
            }
            *stats.by_type.entry(complaint.kind.clone()).or_insert(0) += 1;
        }
        stats
    }
}

/// Durable CRUD and statistics over the complaint collection.
///
/// Mutations hold an internal lock across their whole load-modify-save cycle,
/// so one store may be shared between threads without losing writes. Two
/// stores (or two processes) over the same slot are last-writer-wins.
pub struct ComplaintStore<S, C = SystemClock, I = RandomIds> {
    storage: S,
    clock: C,
    ids: I,
    key: String,
    write_lock: Mutex<()>,
}

impl<S> ComplaintStore<S>
where
    S: KeyValueStore,
{
    /// A store over `storage` using the wall clock, random ids, and the
    /// default slot key.
    pub fn with_defaults(storage: S) -> Self {
        Self::new(storage, SystemClock, RandomIds, DEFAULT_SLOT_KEY)
    }
}

impl<S, C, I> ComplaintStore<S, C, I>
where
    S: KeyValueStore,
    C: Clock,
    I: IdGenerator,
{
    /// Create a store bound to slot `key` of `storage`.
    pub fn new(storage: S, clock: C, ids: I, key: impl Into<String>) -> Self {
        Self {
            storage,
            clock,
            ids,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The slot key this store reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load every complaint, in insertion order.
    ///
    /// An absent slot is an empty collection. A slot that cannot be decoded is
    /// logged at error level and also treated as empty; use
    /// [`load_strict`](Self::load_strict) to observe the corruption instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage slot cannot be read.
    pub fn load_all(&self) -> Result<Vec<Complaint>> {
        match self.load_strict() {
            Err(Error::CorruptCollection { key, source }) => {
                error!(key = %key, error = %source, "Complaint collection is corrupt, treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Load every complaint, failing on undecodable data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptCollection`] if the slot holds data that is not
    /// a complaint array, or a storage error if the slot cannot be read.
    pub fn load_strict(&self) -> Result<Vec<Complaint>> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let complaints: Vec<Complaint> =
            serde_json::from_str(&raw).map_err(|source| Error::CorruptCollection {
                key: self.key.clone(),
                source,
            })?;
        debug!(count = complaints.len(), "Loaded complaints");
        Ok(complaints)
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the slot cannot be written.
    pub fn save_all(&self, complaints: &[Complaint]) -> Result<()> {
        let _guard = self.lock()?;
        self.write(complaints)
    }

    /// Register a new complaint and return its id.
    ///
    /// The id is re-rolled if it collides with an existing complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or written, or if no free
    /// id turns up.
    pub fn add(&self, submission: NewComplaint) -> Result<String> {
        let _guard = self.lock()?;
        let mut complaints = self.load_all()?;
        let id = self.fresh_id(&complaints)?;
        let complaint = Complaint::register(id.clone(), submission, self.clock.now());
        complaints.push(complaint);
        self.write(&complaints)?;
        info!(id = %id, "Registered complaint");
        Ok(id)
    }

    /// Find a complaint by exact id.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Complaint>> {
        Ok(self.load_all()?.into_iter().find(|c| c.id == id))
    }

    /// Complaints passing `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        let mut complaints = self.load_all()?;
        complaints.retain(|c| filter.matches(c));
        Ok(complaints)
    }

    /// Set the status of complaint `id`.
    ///
    /// Returns `false`, without writing, if there is no such complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or written.
    pub fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<bool> {
        let _guard = self.lock()?;
        let mut complaints = self.load_all()?;
        let Some(complaint) = complaints.iter_mut().find(|c| c.id == id) else {
            debug!(id, "No complaint to update");
            return Ok(false);
        };
        complaint.set_status(status, self.clock.now());
        self.write(&complaints)?;
        info!(id, status = %status, "Updated complaint status");
        Ok(true)
    }

    /// Remove every complaint with id `id` and return how many were removed.
    ///
    /// The collection is written back even when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or written.
    pub fn delete(&self, id: &str) -> Result<usize> {
        let _guard = self.lock()?;
        let mut complaints = self.load_all()?;
        let before = complaints.len();
        complaints.retain(|c| c.id != id);
        let removed = before - complaints.len();
        self.write(&complaints)?;
        if removed > 0 {
            info!(id, "Deleted complaint");
        }
        Ok(removed)
    }

    /// The whole collection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn export_all(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.load_all()?)?)
    }

    /// Replace the collection with the complaints in `text`.
    ///
    /// Returns `false`, leaving the store untouched, unless `text` is a JSON
    /// array of complaint records whose `dateUpdated` is not before their
    /// `dateCreated`. Fields a complaint does not define are dropped, so they
    /// do not survive a later export.
    ///
    /// # Errors
    ///
    /// Returns an error only if the slot cannot be written.
    pub fn import_all(&self, text: &str) -> Result<bool> {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Rejected import: invalid JSON");
                return Ok(false);
            }
        };
        if !value.is_array() {
            warn!("Rejected import: top-level value is not an array");
            return Ok(false);
        }
        let complaints: Vec<Complaint> = match serde_json::from_value(value) {
            Ok(complaints) => complaints,
            Err(e) => {
                warn!(error = %e, "Rejected import: malformed complaint record");
                return Ok(false);
            }
        };
        if let Some(c) = complaints.iter().find(|c| c.date_updated < c.date_created) {
            warn!(id = %c.id, "Rejected import: dateUpdated precedes dateCreated");
            return Ok(false);
        }

        let _guard = self.lock()?;
        self.write(&complaints)?;
        info!(count = complaints.len(), "Imported complaints");
        Ok(true)
    }

    /// Remove every complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn clear_all(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.write(&[])?;
        info!("Cleared all complaints");
        Ok(())
    }

    /// Counts by status and by type.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn stats(&self) -> Result<ComplaintStats> {
        Ok(ComplaintStats::tally(&self.load_all()?))
    }

    fn fresh_id(&self, existing: &[Complaint]) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate();
            if existing.iter().all(|c| c.id != candidate) {
                return Ok(candidate);
            }
            debug!(id = %candidate, "Complaint id collision, re-rolling");
        }
        Err(Error::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn write(&self, complaints: &[Complaint]) -> Result<()> {
        let json = serde_json::to_string_pretty(complaints)?;
        self.storage.set(&self.key, &json)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::internal("complaint store lock poisoned"))
    }
}

impl<S, C, I> std::fmt::Debug for ComplaintStore<S, C, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplaintStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// File name for an export taken on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("complaint_data_{}.json", date.format("%Y-%m-%d"))
}
