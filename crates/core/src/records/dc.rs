//! Difficulty class checks and the attribute picker they choose from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use coffer_shared::types::RecordId;

use super::collection::FlagRecord;

/// Skill list entry that is not a real skill.
const LORE_SKILL: &str = "lore";

/// A `group:key` attribute reference such as `skill:ath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeRef {
    /// Attribute group, e.g. `ability`.
    pub group: String,
    /// Key within the group, e.g. `str`.
    pub key: String,
}

impl AttributeRef {
    /// Parses `group:key`. Returns `None` without a separator.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (group, key) = raw.split_once(':')?;
        Some(Self {
            group: group.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.key)
    }
}

/// A DC check attached to a journal page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcCheck {
    /// Record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Attribute as `group:key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Target number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<u32>,
    /// Optional label shown instead of the attribute name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DcCheck {
    /// The parsed attribute, if it is well formed.
    #[must_use]
    pub fn attribute_ref(&self) -> Option<AttributeRef> {
        self.attribute.as_deref().and_then(AttributeRef::parse)
    }

    /// Returns true if the check names an attribute as `group:key`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.attribute_ref().is_some()
    }
}

impl FlagRecord for DcCheck {
    const FLAG_KEY: &'static str = "dcs";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}

/// Attribute names offered by a game system, keyed by attribute key.
pub type OptionMap = BTreeMap<String, String>;

/// The attribute sources a game system exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOptions {
    /// Ability scores.
    #[serde(default)]
    pub abilities: Option<OptionMap>,
    /// Saving throws. Systems without their own list save against abilities.
    #[serde(default)]
    pub saves: Option<OptionMap>,
    /// Skills.
    #[serde(default)]
    pub skills: Option<OptionMap>,
    /// Label of a standalone perception attribute, for systems that have one.
    #[serde(default)]
    pub perception: Option<String>,
}

/// One group of the attribute picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeGroup {
    /// Group id used as the reference prefix.
    pub id: &'static str,
    /// Group heading.
    pub label: &'static str,
    /// Options in the group.
    pub options: OptionMap,
}

/// Attribute picker contents for DC checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeCatalog {
    groups: Vec<AttributeGroup>,
}

impl AttributeCatalog {
    /// Builds the picker from a system's option lists, skipping empty groups.
    #[must_use]
    pub fn build(system: &SystemOptions) -> Self {
        let skills = system.skills.as_ref().map(|skills| {
            let mut skills = skills.clone();
            skills.remove(LORE_SKILL);
            skills
        });
        let saves = system.saves.as_ref().or(system.abilities.as_ref());
        let perception = system
            .perception
            .as_ref()
            .map(|label| OptionMap::from([("perception".to_string(), label.clone())]));

        let candidates = [
            ("ability", "Ability", system.abilities.as_ref()),
            ("save", "Saving Throw", saves),
            ("skill", "Skill", skills.as_ref()),
            ("attribute", "Attribute", perception.as_ref()),
        ];

        let groups = candidates
            .into_iter()
            .filter_map(|(id, label, options)| {
                options.filter(|o| !o.is_empty()).map(|options| AttributeGroup {
                    id,
                    label,
                    options: options.clone(),
                })
            })
            .collect();

        Self { groups }
    }

    /// Picker groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[AttributeGroup] {
        &self.groups
    }

    /// Display name of an attribute, if the picker offers it.
    #[must_use]
    pub fn label(&self, attribute: &AttributeRef) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.id == attribute.group)
            .and_then(|g| g.options.get(&attribute.key))
            .map(String::as_str)
    }
}
