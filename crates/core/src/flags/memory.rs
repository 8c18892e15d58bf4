//! In-memory flag store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use coffer_shared::types::DocumentId;

use super::error::FlagError;
use super::store::{FlagScope, FlagStore};

/// Flags grouped by document, then namespace.
pub type FlagTable = BTreeMap<DocumentId, BTreeMap<String, Map<String, Value>>>;

/// Flag store held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryFlagStore {
    documents: FlagTable,
}

impl MemoryFlagStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from existing flags.
    #[must_use]
    pub fn from_table(documents: FlagTable) -> Self {
        Self { documents }
    }

    /// Documents that carry at least one flag.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.keys()
    }

    fn namespace(&self, scope: &FlagScope) -> Option<&Map<String, Value>> {
        self.documents
            .get(&scope.document)
            .and_then(|namespaces| namespaces.get(&scope.namespace))
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_flag(&self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError> {
        Ok(self.namespace(scope).and_then(|flags| flags.get(key)).cloned())
    }

    fn set_flag(&mut self, scope: &FlagScope, key: &str, value: Value) -> Result<(), FlagError> {
        self.documents
            .entry(scope.document.clone())
            .or_default()
            .entry(scope.namespace.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn unset_flag(&mut self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError> {
        let Some(namespaces) = self.documents.get_mut(&scope.document) else {
            return Ok(None);
        };
        let Some(flags) = namespaces.get_mut(&scope.namespace) else {
            return Ok(None);
        };
        let removed = flags.remove(key);
        if flags.is_empty() {
            namespaces.remove(&scope.namespace);
        }
        if namespaces.is_empty() {
            self.documents.remove(&scope.document);
        }
        Ok(removed)
    }

    fn flags(&self, scope: &FlagScope) -> Result<Map<String, Value>, FlagError> {
        Ok(self.namespace(scope).cloned().unwrap_or_default())
    }
}
