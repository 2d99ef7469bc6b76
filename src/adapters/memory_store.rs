//! In-memory [`PetStore`] adapter.
//!
//! Backs the simulation host and the test suites.  Besides plain storage it
//! can pretend a load is still in flight and inject read or write failures,
//! which is how the service's error paths get exercised.

use std::collections::HashMap;

use log::debug;

use crate::app::ports::{Ack, Lookup, PetStore, StoreError, UserId};
use crate::pet::record::PetRecord;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<UserId, PetRecord>,
    pending: bool,
    read_error: Option<StoreError>,
    write_error: Option<StoreError>,
    patches: usize,
    last_patch: Option<PetRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's record.
    pub fn with_record(mut self, user: &UserId, record: PetRecord) -> Self {
        self.insert(user, record);
        self
    }

    /// Replace a user's record outright (no merge).
    pub fn insert(&mut self, user: &UserId, record: PetRecord) {
        self.records.insert(user.clone(), record);
    }

    /// The stored record, as merged so far.
    pub fn record(&self, user: &UserId) -> Option<&PetRecord> {
        self.records.get(user)
    }

    /// While set, every read answers [`Lookup::Pending`].
    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn fail_reads(&mut self, error: Option<StoreError>) {
        self.read_error = error;
    }

    pub fn fail_writes(&mut self, error: Option<StoreError>) {
        self.write_error = error;
    }

    /// Number of accepted patches.
    pub fn patch_count(&self) -> usize {
        self.patches
    }

    /// The most recent accepted patch.
    pub fn last_patch(&self) -> Option<&PetRecord> {
        self.last_patch.as_ref()
    }
}

impl PetStore for MemoryStore {
    fn read(&self, user: &UserId) -> Result<Lookup, StoreError> {
        if let Some(e) = self.read_error {
            return Err(e);
        }
        if self.pending {
            return Ok(Lookup::Pending);
        }
        Ok(match self.records.get(user) {
            Some(record) => Lookup::Found(record.clone()),
            None => Lookup::NotFound,
        })
    }

    fn patch(&mut self, user: &UserId, patch: &PetRecord) -> Result<Ack, StoreError> {
        if let Some(e) = self.write_error {
            return Err(e);
        }
        self.records.entry(user.clone()).or_default().merge(patch);
        self.patches += 1;
        self.last_patch = Some(patch.clone());

        let fields = patch.field_count();
        debug!("MemoryStore: {} <- {} field(s)", user.pet_path(), fields);
        Ok(Ack { fields })
    }
}
