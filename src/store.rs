//! Record stores the outline is loaded from and synchronised to.
//!
//! Upserts are keyed by id, so sending the same record twice is harmless and
//! a failed sync can simply be retried with the next batch of changes.

use crate::error::StoreError;
use crate::item::Item;
use crate::sync::{build_tree, DeleteOp, SyncTracker, UpsertRecord};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A place outline records live.
pub trait Store {
    /// Every stored record.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be read.
    fn load(&mut self) -> Result<Vec<UpsertRecord>, StoreError>;

    /// Insert or replace `records`, matched by id.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be written.
    fn upsert(&mut self, records: &[UpsertRecord]) -> Result<(), StoreError>;

    /// Remove the records named by `ops`; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be written.
    fn delete(&mut self, ops: &[DeleteOp]) -> Result<(), StoreError>;
}

fn merge(stored: &mut Vec<UpsertRecord>, records: &[UpsertRecord]) {
    for record in records {
        match stored.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => existing.clone_from(record),
            None => stored.push(record.clone()),
        }
    }
}

fn prune(stored: &mut Vec<UpsertRecord>, ops: &[DeleteOp]) {
    stored.retain(|r| !ops.iter().any(|op| op.id == r.id));
}

#[derive(Clone, Debug)]
/// Records kept as a pretty-printed JSON array in a single file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    #[must_use]
    /// A store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[UpsertRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        debug!("wrote {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl Store for JsonStore {
    fn load(&mut self) -> Result<Vec<UpsertRecord>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn upsert(&mut self, records: &[UpsertRecord]) -> Result<(), StoreError> {
        let mut stored = self.load()?;
        merge(&mut stored, records);
        self.write(&stored)
    }

    fn delete(&mut self, ops: &[DeleteOp]) -> Result<(), StoreError> {
        let mut stored = self.load()?;
        prune(&mut stored, ops);
        self.write(&stored)
    }
}

#[derive(Clone, Debug, Default)]
/// Records kept in memory, for tests and for running without a file.
pub struct MemoryStore {
    records: Vec<UpsertRecord>,
}

impl MemoryStore {
    #[must_use]
    /// A store already holding `records`.
    pub fn with_records(records: Vec<UpsertRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    /// Everything stored so far.
    pub fn records(&self) -> &[UpsertRecord] {
        &self.records
    }
}

impl Store for MemoryStore {
    fn load(&mut self) -> Result<Vec<UpsertRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn upsert(&mut self, records: &[UpsertRecord]) -> Result<(), StoreError> {
        merge(&mut self.records, records);
        Ok(())
    }

    fn delete(&mut self, ops: &[DeleteOp]) -> Result<(), StoreError> {
        prune(&mut self.records, ops);
        Ok(())
    }
}

/// Load the tree held by `store`, with a tracker that considers it synced.
///
/// `None` for an empty store.
///
/// # Errors
///
/// Fails if the store cannot be read or its records do not form a tree.
pub fn open(store: &mut dyn Store) -> Result<Option<(Item, SyncTracker)>, StoreError> {
    let records = store.load()?;
    if records.is_empty() {
        return Ok(None);
    }
    let root = build_tree(&records)?;
    info!("loaded {} node(s) from {} record(s)", root.count(), records.len());
    Ok(Some((root, SyncTracker::from_records(&records))))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// How much one [`push`] sent.
pub struct Pushed {
    /// Records upserted.
    pub upserted: usize,
    /// Records deleted.
    pub deleted: usize,
}

/// Send everything that changed in `root` since the last successful push.
///
/// The tracker is only advanced for the parts the store accepted, so a
/// failure is retried by the next call.
///
/// # Errors
///
/// Returns the store's error; upserts that succeeded before a failed delete
/// stay recorded.
pub fn push(store: &mut dyn Store, tracker: &mut SyncTracker, root: &Item) -> Result<Pushed, StoreError> {
    let changes = tracker.changes(root);
    if changes.is_empty() {
        return Ok(Pushed::default());
    }
    if !changes.upserts.is_empty() {
        store.upsert(&changes.upserts)?;
        tracker.mark_upserted(&changes.upserts);
    }
    if !changes.deletes.is_empty() {
        store.delete(&changes.deletes)?;
        tracker.mark_deleted(&changes.deletes);
    }
    let pushed = Pushed {
        upserted: changes.upserts.len(),
        deleted: changes.deletes.len(),
    };
    info!("synced {} upsert(s), {} delete(s)", pushed.upserted, pushed.deleted);
    Ok(pushed)
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
