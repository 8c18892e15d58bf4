//! Record lists stored under a single flag key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use coffer_shared::types::RecordId;

use crate::flags::{FlagScope, FlagStore};

use super::error::RecordError;

/// Where a new record goes in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Newest first.
    Front,
    /// Newest last.
    Back,
}

/// A record kept in a document flag list.
pub trait FlagRecord: Serialize + DeserializeOwned + Clone {
    /// Flag key of the list.
    const FLAG_KEY: &'static str;

    /// Where newly created records are inserted.
    const INSERT_AT: InsertPosition = InsertPosition::Back;

    /// The record id, if one has been assigned.
    fn id(&self) -> Option<&RecordId>;

    /// Assigns the record id.
    fn set_id(&mut self, id: RecordId);
}

/// Inserts or replaces a record and returns its id.
///
/// A record without an id gets a fresh one and is inserted at the list's
/// insert position. A record with an id replaces the entry with that id, or
/// is appended if no entry has it.
pub fn upsert<R: FlagRecord>(list: &mut Vec<R>, mut record: R) -> RecordId {
    if let Some(id) = record.id().cloned() {
        if let Some(existing) = list.iter_mut().find(|r| r.id() == Some(&id)) {
            *existing = record;
        } else {
            list.push(record);
        }
        return id;
    }

    let id = RecordId::generate();
    record.set_id(id.clone());
    match R::INSERT_AT {
        InsertPosition::Front => list.insert(0, record),
        InsertPosition::Back => list.push(record),
    }
    debug!(key = R::FLAG_KEY, id = %id, "created record");
    id
}

/// Removes the record with `id`.
pub fn remove<R: FlagRecord>(list: &mut Vec<R>, id: &RecordId) -> Option<R> {
    let index = list.iter().position(|r| r.id() == Some(id))?;
    Some(list.remove(index))
}

/// Finds the record with `id`.
#[must_use]
pub fn find<'a, R: FlagRecord>(list: &'a [R], id: &RecordId) -> Option<&'a R> {
    list.iter().find(|r| r.id() == Some(id))
}

/// Reads a record list from a document. A missing flag is an empty list.
///
/// # Errors
///
/// Returns an error if the stored list cannot be decoded.
pub fn load<R: FlagRecord, S: FlagStore>(store: &S, scope: &FlagScope) -> Result<Vec<R>, RecordError> {
    Ok(store.read_or_default(scope, R::FLAG_KEY)?)
}

/// Writes a record list to a document.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn save<R: FlagRecord, S: FlagStore>(
    store: &mut S,
    scope: &FlagScope,
    list: &[R],
) -> Result<(), RecordError> {
    store.write(scope, R::FLAG_KEY, list)?;
    Ok(())
}
