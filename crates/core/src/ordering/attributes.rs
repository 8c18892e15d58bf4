//! Person and place attribute lists edited as a single ordered list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::list::move_item;

/// Which attribute list is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Attributes shown on person pages.
    Person,
    /// Attributes shown on place pages.
    Place,
}

impl AttributeKind {
    /// Settings key the list is saved under.
    #[must_use]
    pub fn settings_key(self) -> &'static str {
        match self {
            Self::Person => "person-attributes",
            Self::Place => "place-attributes",
        }
    }

    /// The stock attributes for this kind.
    #[must_use]
    pub fn defaults(self) -> Vec<AttributeField> {
        let ids: &[(&str, &str)] = match self {
            Self::Person => &[
                ("race", "Race"),
                ("gender", "Gender"),
                ("age", "Age"),
                ("eyes", "Eyes"),
                ("skin", "Skin"),
                ("hair", "Hair"),
                ("profession", "Profession"),
                ("voice", "Voice"),
                ("faction", "Faction"),
                ("height", "Height"),
                ("weight", "Weight"),
                ("traits", "Traits"),
                ("ideals", "Ideals"),
                ("bonds", "Bonds"),
                ("flaws", "Flaws"),
            ],
            Self::Place => &[
                ("age", "Age"),
                ("size", "Size"),
                ("government", "Government"),
                ("alignment", "Alignment"),
                ("faction", "Faction"),
                ("inhabitants", "Inhabitants"),
                ("districts", "Districts"),
                ("agricultural", "Agricultural"),
                ("cultural", "Cultural"),
                ("educational", "Educational"),
                ("industrial", "Industrial"),
                ("mercantile", "Mercantile"),
                ("military", "Military"),
            ],
        };
        ids.iter()
            .map(|(id, name)| AttributeField::new(*id, *name))
            .collect()
    }
}

/// One editable attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeField {
    /// Attribute id, ASCII letters only.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hidden from players.
    #[serde(default)]
    pub hidden: bool,
    /// Spans the full row.
    #[serde(default)]
    pub full: bool,
}

impl AttributeField {
    /// Creates a visible half-width attribute.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hidden: false,
            full: false,
        }
    }
}

/// Working copy of an attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    kind: AttributeKind,
    fields: Vec<AttributeField>,
}

impl AttributeList {
    /// Starts editing an existing list.
    #[must_use]
    pub fn new(kind: AttributeKind, fields: Vec<AttributeField>) -> Self {
        Self { kind, fields }
    }

    /// Starts editing the stock list for `kind`.
    #[must_use]
    pub fn with_defaults(kind: AttributeKind) -> Self {
        Self::new(kind, kind.defaults())
    }

    /// List kind.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Current fields in order.
    #[must_use]
    pub fn fields(&self) -> &[AttributeField] {
        &self.fields
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Appends an empty row.
    pub fn add_blank(&mut self) {
        self.fields.push(AttributeField::new("", ""));
    }

    /// Changes an attribute id.
    ///
    /// Non-letters are stripped from the new id. Returns the id actually
    /// stored, or `None` if no row has `old` or another row already uses the
    /// new id.
    pub fn rename(&mut self, old: &str, new: &str) -> Option<String> {
        let cleaned: String = new.chars().filter(char::is_ascii_alphabetic).collect();
        let index = self.index_of(old)?;
        if cleaned != old && self.index_of(&cleaned).is_some() {
            debug!(old, new = %cleaned, "attribute id already in use");
            return None;
        }
        self.fields[index].id.clone_from(&cleaned);
        Some(cleaned)
    }

    /// Sets the display name of an attribute.
    pub fn set_name(&mut self, id: &str, name: &str) -> bool {
        self.field_mut(id).map(|f| f.name = name.to_string()).is_some()
    }

    /// Sets whether an attribute is hidden.
    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
        self.field_mut(id).map(|f| f.hidden = hidden).is_some()
    }

    /// Sets whether an attribute spans the full row.
    pub fn set_full(&mut self, id: &str, full: bool) -> bool {
        self.field_mut(id).map(|f| f.full = full).is_some()
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut AttributeField> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Removes an attribute.
    pub fn remove(&mut self, id: &str) -> Option<AttributeField> {
        let index = self.index_of(id)?;
        Some(self.fields.remove(index))
    }

    /// Drops `dragged` onto `target`, taking the target's index.
    pub fn move_before(&mut self, dragged: &str, target: &str) -> bool {
        if dragged == target {
            return false;
        }
        match (self.index_of(dragged), self.index_of(target)) {
            (Some(from), Some(to)) => move_item(&mut self.fields, from, to),
            _ => false,
        }
    }

    /// Replaces the list with the stock attributes for its kind.
    pub fn reset(&mut self) {
        self.fields = self.kind.defaults();
    }

    /// Returns the rows to save, dropping any without an id or a name.
    #[must_use]
    pub fn finalize(self) -> Vec<AttributeField> {
        self.fields
            .into_iter()
            .filter(|f| !f.id.is_empty() && !f.name.is_empty())
            .collect()
    }
}
