//! Page fields ordered by an explicit integer `order`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use coffer_shared::types::RecordId;

/// A customisable field on a journal page type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageField {
    /// Field id.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Shown on the page.
    pub shown: bool,
    /// Spans the full row.
    pub full: bool,
    /// Sort position.
    pub order: i64,
}

/// The fields of one page type, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedFields {
    fields: BTreeMap<RecordId, PageField>,
}

impl OrderedFields {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&PageField> {
        self.fields.get(id)
    }

    /// Inserts or replaces a field as given.
    pub fn insert(&mut self, field: PageField) {
        self.fields.insert(field.id.clone(), field);
    }

    /// Appends a blank shown field after the current last one.
    pub fn add(&mut self) -> RecordId {
        let order = self.fields.values().map(|f| f.order).max().unwrap_or(0) + 1;
        let id = RecordId::generate();
        self.insert(PageField {
            id: id.clone(),
            name: String::new(),
            shown: true,
            full: false,
            order,
        });
        id
    }

    /// Removes a field. Orders of the other fields are left as they are.
    pub fn remove(&mut self, id: &RecordId) -> Option<PageField> {
        self.fields.remove(id)
    }

    /// Sets a field's name.
    pub fn set_name(&mut self, id: &RecordId, name: &str) -> bool {
        self.fields
            .get_mut(id)
            .map(|f| f.name = name.to_string())
            .is_some()
    }

    /// Sets whether a field is shown.
    pub fn set_shown(&mut self, id: &RecordId, shown: bool) -> bool {
        self.fields.get_mut(id).map(|f| f.shown = shown).is_some()
    }

    /// Sets whether a field spans the full row.
    pub fn set_full(&mut self, id: &RecordId, full: bool) -> bool {
        self.fields.get_mut(id).map(|f| f.full = full).is_some()
    }

    /// Moves the field at order `from` to order `to`.
    ///
    /// Fields between the two positions shift by one toward the vacated slot.
    /// Nothing happens if no field has order `from`.
    pub fn reorder(&mut self, from: i64, to: i64) {
        if from == to {
            return;
        }
        let Some(moved) = self
            .fields
            .values()
            .find(|f| f.order == from)
            .map(|f| f.id.clone())
        else {
            return;
        };

        for field in self.fields.values_mut() {
            if from < to && field.order > from && field.order <= to {
                field.order -= 1;
            } else if from > to && field.order < from && field.order >= to {
                field.order += 1;
            }
        }

        if let Some(field) = self.fields.get_mut(&moved) {
            field.order = to;
        }
        debug!(from, to, "reordered page fields");
    }

    /// Drops `dragged` onto `target`, taking the target's position.
    pub fn move_field(&mut self, dragged: &RecordId, target: &RecordId) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.fields.get(dragged).map(|f| f.order),
            self.fields.get(target).map(|f| f.order),
        ) else {
            return false;
        };
        self.reorder(from, to);
        true
    }

    /// Fields in display order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&PageField> {
        let mut fields: Vec<&PageField> = self.fields.values().collect();
        fields.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        fields
    }
}

impl FromIterator<PageField> for OrderedFields {
    fn from_iter<I: IntoIterator<Item = PageField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|f| (f.id.clone(), f)).collect(),
        }
    }
}
