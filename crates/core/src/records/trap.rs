//! Trap records.

use serde::{Deserialize, Serialize};

use coffer_shared::types::RecordId;

use super::collection::FlagRecord;

/// A trap noted on an encounter or place page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    /// Record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Trap name.
    #[serde(default)]
    pub name: String,
    /// Description shown to the GM.
    #[serde(default)]
    pub description: String,
    /// Difficulty to spot or disarm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<u32>,
}

impl FlagRecord for Trap {
    const FLAG_KEY: &'static str = "traps";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}
