//! Player offerings of items and coin to a shop or loot source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use coffer_shared::types::{CoinPurse, DenominationId, RecordId, UserId, parse_whole_amount};

use super::collection::{FlagRecord, InsertPosition};
use super::error::RecordError;

/// Lifecycle of an offering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferingState {
    /// Being put together.
    #[default]
    Draft,
    /// Submitted to the GM.
    Offering,
    /// Taken by the GM.
    Accepted,
    /// Turned down by the GM.
    Rejected,
    /// Withdrawn by the player.
    Cancelled,
}

/// The character making an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    /// Actor id.
    pub id: String,
    /// Actor name.
    pub name: String,
    /// Portrait path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// An item put into an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedItem {
    /// Item id on the owning actor.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Owning actor id.
    pub actor_id: String,
    /// Owning actor name.
    pub actor_name: String,
    /// Quantity offered.
    pub qty: u32,
}

/// A proposed trade from a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Submitting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<UserId>,
    /// Lifecycle state.
    #[serde(default)]
    pub state: OfferingState,
    /// Hidden from other players.
    #[serde(default)]
    pub hidden: bool,
    /// Character making the offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRef>,
    /// Offered items.
    #[serde(default)]
    pub items: Vec<OfferedItem>,
    /// Offered coin.
    #[serde(default)]
    pub currency: CoinPurse,
}

impl Offering {
    /// Starts a draft for a character.
    #[must_use]
    pub fn for_actor(actor: Option<ActorRef>) -> Self {
        Self {
            actor,
            ..Self::default()
        }
    }

    /// Sets the character making the offer.
    pub fn set_actor(&mut self, actor: ActorRef) {
        self.actor = Some(actor);
    }

    /// Adds an item dropped from a character's inventory.
    ///
    /// The item's owner becomes the offering actor.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidQuantity` unless `qty` is positive.
    pub fn add_item(&mut self, owner: ActorRef, id: &str, name: &str, qty: i64) -> Result<(), RecordError> {
        let qty = u32::try_from(qty)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| RecordError::InvalidQuantity {
                item: id.to_string(),
                qty,
            })?;

        self.items.push(OfferedItem {
            id: id.to_string(),
            name: name.to_string(),
            actor_id: owner.id.clone(),
            actor_name: owner.name.clone(),
            qty,
        });
        self.actor = Some(owner);
        Ok(())
    }

    /// Removes an item.
    pub fn remove_item(&mut self, id: &str) -> Option<OfferedItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sets an offered coin amount from form input. Empty or invalid is zero.
    pub fn set_currency(&mut self, denomination: DenominationId, raw: &str) {
        let amount = parse_whole_amount(raw).unwrap_or(Decimal::ZERO);
        self.currency.set(denomination, amount);
    }

    /// Returns true if nothing is offered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.currency.is_all_zero()
    }

    /// Marks the offering as submitted by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::EmptyOffering` if nothing is offered.
    pub fn submit(&mut self, user: UserId) -> Result<(), RecordError> {
        if self.is_empty() {
            return Err(RecordError::EmptyOffering);
        }
        debug!(user = %user, items = self.items.len(), "offering submitted");
        self.userid = Some(user);
        self.state = OfferingState::Offering;
        Ok(())
    }
}

impl FlagRecord for Offering {
    const FLAG_KEY: &'static str = "offerings";
    const INSERT_AT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}
