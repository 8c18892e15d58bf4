//! Quest objective records.

use serde::{Deserialize, Serialize};

use coffer_shared::types::RecordId;

use super::collection::FlagRecord;

/// One objective of a quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// Record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Short title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Count needed to complete, if the objective is counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<u32>,
    /// Count done so far.
    #[serde(default)]
    pub done: u32,
    /// Marked complete.
    #[serde(default)]
    pub status: bool,
    /// Visible to players.
    #[serde(default)]
    pub available: bool,
}

impl Objective {
    /// Returns true if the objective is marked complete or its count is met.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status || self.required.is_some_and(|required| self.done >= required)
    }

    /// Adds progress toward the required count, stopping at the count.
    pub fn progress(&mut self, by: u32) {
        let done = self.done.saturating_add(by);
        self.done = self.required.map_or(done, |required| done.min(required));
    }
}

impl FlagRecord for Objective {
    const FLAG_KEY: &'static str = "objectives";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}
