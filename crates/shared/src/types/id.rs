//! Typed IDs for type-safe references to host documents and table entries.
//!
//! Using typed IDs prevents accidentally passing a `RecipientId` where a
//! `DenominationId` is expected. Host ids are opaque strings, so the wrappers
//! hold a `String` rather than a UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of generated record ids.
const GENERATED_ID_LEN: usize = 16;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wraps an existing id.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the id is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(DenominationId, "Identifier of a currency denomination (e.g. `gp`).");
typed_id!(RecipientId, "Identifier of a character receiving currency.");
typed_id!(DocumentId, "Identifier of a host document that carries flags.");
typed_id!(UserId, "Identifier of a host user.");
typed_id!(RecordId, "Identifier of a record stored in a document flag list.");

impl RecordId {
    /// Generates a fresh 16-character alphanumeric record id.
    #[must_use]
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(GENERATED_ID_LEN);
        Self(id)
    }
}
