//! Flag storage trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use coffer_shared::types::DocumentId;

use super::error::FlagError;

/// Where a flag lives: a host document plus a module namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagScope {
    /// Document carrying the flag.
    pub document: DocumentId,
    /// Module namespace.
    pub namespace: String,
}

impl FlagScope {
    /// Creates a scope.
    #[must_use]
    pub fn new(document: impl Into<DocumentId>, namespace: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            namespace: namespace.into(),
        }
    }

    /// Same namespace on another document.
    #[must_use]
    pub fn on(&self, document: impl Into<DocumentId>) -> Self {
        Self::new(document, self.namespace.clone())
    }
}

/// Key-value storage for JSON flags on host documents.
///
/// Writes take `&mut self`; callers serialise edits to one document.
pub trait FlagStore {
    /// Reads a flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end cannot be read.
    fn get_flag(&self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError>;

    /// Writes a flag, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end cannot be written.
    fn set_flag(&mut self, scope: &FlagScope, key: &str, value: Value) -> Result<(), FlagError>;

    /// Removes a flag, returning the old value.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end cannot be written.
    fn unset_flag(&mut self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError>;

    /// All flags in a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end cannot be read.
    fn flags(&self, scope: &FlagScope) -> Result<Map<String, Value>, FlagError>;

    /// Reads and decodes a flag (convenience wrapper).
    ///
    /// # Errors
    ///
    /// Returns `FlagError::Decode` if the stored value has the wrong shape.
    fn read<T: DeserializeOwned>(&self, scope: &FlagScope, key: &str) -> Result<Option<T>, FlagError>
    where
        Self: Sized,
    {
        self.get_flag(scope, key)?
            .map(|value| {
                serde_json::from_value(value).map_err(|source| FlagError::Decode {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Reads a flag, falling back to the type's default when unset.
    ///
    /// # Errors
    ///
    /// Returns `FlagError::Decode` if the stored value has the wrong shape.
    fn read_or_default<T: DeserializeOwned + Default>(
        &self,
        scope: &FlagScope,
        key: &str,
    ) -> Result<T, FlagError>
    where
        Self: Sized,
    {
        Ok(self.read(scope, key)?.unwrap_or_default())
    }

    /// Encodes and writes a flag (convenience wrapper).
    ///
    /// # Errors
    ///
    /// Returns `FlagError::Encode` if the value cannot be encoded.
    fn write<T: Serialize + ?Sized>(
        &mut self,
        scope: &FlagScope,
        key: &str,
        value: &T,
    ) -> Result<(), FlagError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value).map_err(|source| FlagError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_flag(scope, key, value)
    }
}
