//! Loot service: reads and writes distributions, transfers and journal
//! records through a flag store.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use coffer_shared::config::{DistributionConfig, PricingConfig};
use coffer_shared::types::{CoinPurse, DenominationId, DocumentId, RecordId, UserId};

use crate::currency::{
    CurrencyDistributor, CurrencyTransfer, DenominationError, DenominationTable,
    DistributionOutcome, Recipient,
};
use crate::flags::{FlagError, FlagScope, FlagStore};
use crate::pricing::{Adjustment, PriceAdjustments, ShopItem};
use crate::records::{self, DcCheck, FlagRecord, Offering};

use super::error::LootError;

/// Flag key holding a document's coin.
pub const CURRENCY_KEY: &str = "currency";

/// Flag key holding a shop or loot document's items.
pub const ITEMS_KEY: &str = "items";

/// Flag key holding a document's price adjustment overrides.
pub const ADJUSTMENT_KEY: &str = "adjustment";

/// Whether the caller may write the target document directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAuthority {
    /// The caller owns the document or is the GM.
    Owner,
    /// The write has to be relayed to someone who may make it.
    Relay,
}

/// A write that has to be carried out by someone else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayRequest {
    /// Action name.
    pub action: &'static str,
    /// Target document.
    pub document: DocumentId,
    /// Action payload.
    pub payload: Value,
}

/// Result of a write that may need relaying.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Written to the store.
    Stored,
    /// Not written; the request has to be relayed.
    Relayed(RelayRequest),
}

/// Loot service for business logic over a flag store.
pub struct LootService;

impl LootService {
    /// Reads a document's coin. An unset flag is an empty purse.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored coin cannot be decoded.
    pub fn currency<S: FlagStore>(
        store: &S,
        scope: &FlagScope,
        document: &DocumentId,
    ) -> Result<CoinPurse, LootError> {
        Ok(store.read_or_default(&scope.on(document.clone()), CURRENCY_KEY)?)
    }

    fn write_currency<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        document: &DocumentId,
        purse: &CoinPurse,
    ) -> Result<(), LootError> {
        store.write(&scope.on(document.clone()), CURRENCY_KEY, purse)?;
        Ok(())
    }

    /// Opens a distribution of a loot document's coin.
    ///
    /// # Errors
    ///
    /// Returns an error if the loot's coin cannot be read.
    pub fn open_distribution<S: FlagStore>(
        store: &S,
        scope: &FlagScope,
        loot: &DocumentId,
        recipients: Vec<Recipient>,
        table: DenominationTable,
        settings: &DistributionConfig,
    ) -> Result<CurrencyDistributor, LootError> {
        let pool = Self::currency(store, scope, loot)?;
        debug!(loot = %loot, recipients = recipients.len(), "opening distribution");
        Ok(CurrencyDistributor::from_config(table, pool, recipients, settings))
    }

    /// Writes a finished distribution back.
    ///
    /// The loot keeps the remainder and each recipient's payout is added to
    /// the coin they already hold.
    ///
    /// Every recipient purse is read before anything is written, so a purse
    /// that cannot be decoded leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any purse cannot be read or written.
    pub fn commit_distribution<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        loot: &DocumentId,
        outcome: &DistributionOutcome,
    ) -> Result<(), LootError> {
        let mut purses = Vec::with_capacity(outcome.payouts.len());
        for (recipient, payout) in &outcome.payouts {
            if payout.is_all_zero() {
                continue;
            }
            let document = DocumentId::from(recipient.as_str());
            let mut purse = Self::currency(store, scope, &document)?;
            purse.absorb(payout);
            purses.push((document, purse));
        }

        Self::write_currency(store, scope, loot, &outcome.remainder)?;
        for (document, purse) in &purses {
            Self::write_currency(store, scope, document, purse)?;
            debug!(recipient = %document, "payout written");
        }

        info!(loot = %loot, recipients = outcome.payouts.len(), "distribution committed");
        Ok(())
    }

    /// Builds a transfer draft from `denomination=amount` pairs.
    ///
    /// Amounts are capped at what the loot holds.
    ///
    /// # Errors
    ///
    /// Returns `DenominationError::NotFound` for a denomination that the
    /// table does not list or that has no rate.
    pub fn draft_transfer<S: FlagStore>(
        store: &S,
        scope: &FlagScope,
        loot: &DocumentId,
        table: &DenominationTable,
        amounts: &[(DenominationId, String)],
    ) -> Result<CurrencyTransfer, LootError> {
        let held = Self::currency(store, scope, loot)?;
        let mut transfer = CurrencyTransfer::new();
        for (denomination, raw) in amounts {
            if !table.transferable().any(|d| &d.id == denomination) {
                return Err(DenominationError::NotFound(denomination.clone()).into());
            }
            transfer.set_amount(denomination.clone(), raw, held.amount(denomination));
        }
        Ok(transfer)
    }

    /// Moves coin between a loot document and a character.
    ///
    /// The transfer is validated against both purses first. A relayed
    /// transfer is not written.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if either side cannot cover the transfer.
    pub fn commit_transfer<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        loot: &DocumentId,
        actor: &DocumentId,
        transfer: &CurrencyTransfer,
        authority: WriteAuthority,
    ) -> Result<Submission, LootError> {
        let loot_purse = Self::currency(store, scope, loot)?;
        let actor_purse = Self::currency(store, scope, actor)?;
        let (loot_purse, actor_purse) = transfer.apply(&loot_purse, &actor_purse)?;

        if authority == WriteAuthority::Relay {
            let payload = serde_json::json!({
                "actor": actor,
                "amounts": transfer.amounts(),
            });
            debug!(loot = %loot, actor = %actor, "transfer relayed");
            return Ok(Submission::Relayed(RelayRequest {
                action: "transferCurrency",
                document: loot.clone(),
                payload,
            }));
        }

        Self::write_currency(store, scope, loot, &loot_purse)?;
        Self::write_currency(store, scope, actor, &actor_purse)?;
        info!(loot = %loot, actor = %actor, "transfer committed");
        Ok(Submission::Stored)
    }

    /// Recomputes the selling cost of every item on a shop or loot document.
    ///
    /// The document's own adjustment overrides are layered on the configured
    /// defaults. Returns the number of items priced.
    ///
    /// # Errors
    ///
    /// Returns an error if the items or overrides cannot be read or written.
    pub fn adjust_prices<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        defaults: &PricingConfig,
    ) -> Result<usize, LootError> {
        let overrides: BTreeMap<String, Adjustment> = store.read_or_default(scope, ADJUSTMENT_KEY)?;
        let adjustments = PriceAdjustments::from_config(defaults).merged(&overrides);

        let mut items: Vec<ShopItem> = store.read_or_default(scope, ITEMS_KEY)?;
        adjustments.apply_to_items(&mut items, &defaults.default_currency);
        store.write(scope, ITEMS_KEY, &items)?;

        info!(document = %scope.document, items = items.len(), "prices adjusted");
        Ok(items.len())
    }

    /// Submits an offering to a shop or loot document.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::EmptyOffering` if nothing is offered.
    pub fn submit_offering<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        mut offering: Offering,
        user: UserId,
        authority: WriteAuthority,
    ) -> Result<Submission, LootError> {
        offering.submit(user)?;

        if authority == WriteAuthority::Relay {
            let payload = serde_json::to_value(&offering).map_err(|source| FlagError::Encode {
                key: Offering::FLAG_KEY.to_string(),
                source,
            })?;
            return Ok(Submission::Relayed(RelayRequest {
                action: "makeOffering",
                document: scope.document.clone(),
                payload,
            }));
        }

        Self::save_record(store, scope, offering)?;
        Ok(Submission::Stored)
    }

    /// Inserts or replaces a record in its document list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    pub fn save_record<R: FlagRecord, S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        record: R,
    ) -> Result<RecordId, LootError> {
        let mut list: Vec<R> = records::load(store, scope)?;
        let id = records::upsert(&mut list, record);
        records::save(store, scope, &list)?;
        Ok(id)
    }

    /// Deletes a record from its document list.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if no record has `id`.
    pub fn delete_record<R: FlagRecord, S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        id: &RecordId,
    ) -> Result<R, LootError> {
        let mut list: Vec<R> = records::load(store, scope)?;
        let removed = records::remove(&mut list, id)
            .ok_or_else(|| records::RecordError::NotFound(id.clone()))?;
        records::save(store, scope, &list)?;
        Ok(removed)
    }

    /// Closes the DC editor, deleting the check if it was left malformed.
    ///
    /// Returns true if the check was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    pub fn close_dc_editor<S: FlagStore>(
        store: &mut S,
        scope: &FlagScope,
        dc: &DcCheck,
    ) -> Result<bool, LootError> {
        let Some(id) = dc.id.as_ref() else {
            return Ok(false);
        };
        if dc.is_well_formed() {
            return Ok(false);
        }

        let mut list: Vec<DcCheck> = records::load(store, scope)?;
        if records::remove(&mut list, id).is_none() {
            return Ok(false);
        }
        records::save(store, scope, &list)?;
        debug!(id = %id, "deleted malformed dc check");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::TransferError;
    use crate::flags::MemoryFlagStore;
    use crate::records::{ActorRef, Trap};
    use coffer_shared::types::{CoinAmount, Denomination};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn scope() -> FlagScope {
        FlagScope::new("loot", "coffer")
    }

    fn table() -> DenominationTable {
        DenominationTable::new(vec![
            Denomination::new("gp", "Gold", Some(dec!(1))),
            Denomination::new("sp", "Silver", Some(dec!(10))),
        ])
    }

    fn store_with_loot(currency: Value) -> MemoryFlagStore {
        let mut store = MemoryFlagStore::new();
        store.set_flag(&scope(), CURRENCY_KEY, currency).unwrap();
        store
    }

    fn amount(store: &MemoryFlagStore, doc: &str, denom: &str) -> Decimal {
        LootService::currency(store, &scope(), &DocumentId::from(doc))
            .unwrap()
            .amount(&DenominationId::from(denom))
    }

    #[test]
    fn test_distribution_round_trip() {
        let mut store = store_with_loot(json!({"gp": 7, "sp": 1}));
        store
            .set_flag(&scope().on("pc1"), CURRENCY_KEY, json!({"gp": 2}))
            .unwrap();

        let recipients = vec![Recipient::new("pc1", "Aria"), Recipient::new("pc2", "Bram")];
        let mut distributor = LootService::open_distribution(
            &store,
            &scope(),
            &DocumentId::from("loot"),
            recipients,
            table(),
            &DistributionConfig::default(),
        )
        .unwrap();
        assert_eq!(distributor.pool().amount(&DenominationId::from("gp")), dec!(7));

        distributor.split_evenly(true);
        LootService::commit_distribution(
            &mut store,
            &scope(),
            &DocumentId::from("loot"),
            &distributor.outcome(),
        )
        .unwrap();

        // 7 gp -> 3 each + 1 gp converted to 10 sp; 11 sp -> 5 each, 1 left
        assert_eq!(amount(&store, "loot", "gp"), dec!(0));
        assert_eq!(amount(&store, "loot", "sp"), dec!(1));
        assert_eq!(amount(&store, "pc1", "gp"), dec!(5));
        assert_eq!(amount(&store, "pc1", "sp"), dec!(5));
        assert_eq!(amount(&store, "pc2", "gp"), dec!(3));
    }

    #[test]
    fn test_distribution_with_unreadable_purse_writes_nothing() {
        let mut store = store_with_loot(json!({"gp": 10}));
        store
            .set_flag(&scope().on("pc2"), CURRENCY_KEY, json!("garbage"))
            .unwrap();

        let recipients = vec![Recipient::new("pc1", "Aria"), Recipient::new("pc2", "Bram")];
        let mut distributor = LootService::open_distribution(
            &store,
            &scope(),
            &DocumentId::from("loot"),
            recipients,
            table(),
            &DistributionConfig::default(),
        )
        .unwrap();
        distributor.split_evenly(false);

        let result = LootService::commit_distribution(
            &mut store,
            &scope(),
            &DocumentId::from("loot"),
            &distributor.outcome(),
        );
        assert!(matches!(result, Err(LootError::Flag(_))));
        assert_eq!(amount(&store, "loot", "gp"), dec!(10));
        assert_eq!(amount(&store, "pc1", "gp"), dec!(0));
    }

    #[test]
    fn test_auto_distribute_setting() {
        let store = store_with_loot(json!({"gp": 4}));
        let settings = DistributionConfig {
            auto_distribute: true,
            convert_remainder: false,
        };
        let recipients = vec![
            Recipient::new("pc1", "Aria"),
            Recipient::new("pc2", "Bram").with_holding("gp", CoinAmount::Excluded),
        ];
        let distributor = LootService::open_distribution(
            &store,
            &scope(),
            &DocumentId::from("loot"),
            recipients,
            table(),
            &settings,
        )
        .unwrap();

        assert!(distributor.pool().is_all_zero());
        let pc1 = distributor.recipient(&"pc1".into()).unwrap();
        assert_eq!(pc1.holding(&"gp".into()), CoinAmount::Held(dec!(4)));
    }

    #[test]
    fn test_transfer_stored() {
        let mut store = store_with_loot(json!({"gp": 10}));
        let loot = DocumentId::from("loot");
        let actor = DocumentId::from("pc1");

        let transfer = LootService::draft_transfer(
            &store,
            &scope(),
            &loot,
            &table(),
            &[(DenominationId::from("gp"), "25".to_string())],
        )
        .unwrap();
        assert_eq!(transfer.amounts().amount(&DenominationId::from("gp")), dec!(10));

        let result = LootService::commit_transfer(
            &mut store,
            &scope(),
            &loot,
            &actor,
            &transfer,
            WriteAuthority::Owner,
        )
        .unwrap();
        assert_eq!(result, Submission::Stored);
        assert_eq!(amount(&store, "loot", "gp"), dec!(0));
        assert_eq!(amount(&store, "pc1", "gp"), dec!(10));
    }

    #[test]
    fn test_transfer_relayed_leaves_store() {
        let mut store = store_with_loot(json!({"gp": 10}));
        let transfer = CurrencyTransfer::from_amounts(
            [(DenominationId::from("gp"), dec!(4))].into_iter().collect(),
        );

        let result = LootService::commit_transfer(
            &mut store,
            &scope(),
            &DocumentId::from("loot"),
            &DocumentId::from("pc1"),
            &transfer,
            WriteAuthority::Relay,
        )
        .unwrap();

        let Submission::Relayed(request) = result else {
            panic!("expected a relay request");
        };
        assert_eq!(request.action, "transferCurrency");
        assert_eq!(request.payload["actor"], "pc1");
        assert_eq!(amount(&store, "loot", "gp"), dec!(10));
    }

    #[test]
    fn test_transfer_rejected() {
        let mut store = store_with_loot(json!({"gp": 1}));
        let transfer = CurrencyTransfer::from_amounts(
            [(DenominationId::from("sp"), dec!(-3))].into_iter().collect(),
        );
        let err = LootService::commit_transfer(
            &mut store,
            &scope(),
            &DocumentId::from("loot"),
            &DocumentId::from("pc1"),
            &transfer,
            WriteAuthority::Owner,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LootError::Transfer(TransferError::InsufficientActor { .. })
        ));
    }

    #[test]
    fn test_draft_rejects_unknown_denomination() {
        let store = store_with_loot(json!({"gp": 1}));
        let err = LootService::draft_transfer(
            &store,
            &scope(),
            &DocumentId::from("loot"),
            &table(),
            &[(DenominationId::from("xp"), "1".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, LootError::Denomination(_)));
    }

    #[test]
    fn test_adjust_prices_uses_document_overrides() {
        let mut store = MemoryFlagStore::new();
        let shop = FlagScope::new("shop", "coffer");
        store
            .set_flag(
                &shop,
                ITEMS_KEY,
                json!([
                    {"id": "a", "name": "Axe", "type": "weapon", "price": "5 gp"},
                    {"id": "b", "name": "Rope", "type": "gear", "price": "3"}
                ]),
            )
            .unwrap();
        store
            .set_flag(&shop, ADJUSTMENT_KEY, json!({"weapon": {"sell": "1.5"}}))
            .unwrap();

        let priced = LootService::adjust_prices(&mut store, &shop, &PricingConfig::default()).unwrap();
        assert_eq!(priced, 2);

        let items: Vec<ShopItem> = store.read(&shop, ITEMS_KEY).unwrap().unwrap();
        assert_eq!(items[0].cost.as_deref(), Some("8 gp"));
        assert_eq!(items[1].cost.as_deref(), Some("3 gp"));
    }

    #[test]
    fn test_offering_stored_first() {
        let mut store = MemoryFlagStore::new();
        let shop = FlagScope::new("shop", "coffer");
        for name in ["Rope", "Lantern"] {
            let mut offering = Offering::default();
            offering
                .add_item(
                    ActorRef { id: "pc1".into(), name: "Aria".into(), img: None },
                    &name.to_lowercase(),
                    name,
                    1,
                )
                .unwrap();
            let result = LootService::submit_offering(
                &mut store,
                &shop,
                offering,
                UserId::from("u1"),
                WriteAuthority::Owner,
            )
            .unwrap();
            assert_eq!(result, Submission::Stored);
        }

        let offerings: Vec<Offering> = records::load(&store, &shop).unwrap();
        assert_eq!(offerings.len(), 2);
        assert_eq!(offerings[0].items[0].name, "Lantern");
        assert!(offerings.iter().all(|o| o.id.is_some()));
    }

    #[test]
    fn test_offering_relayed() {
        let mut store = MemoryFlagStore::new();
        let mut offering = Offering::default();
        offering.set_currency(DenominationId::from("gp"), "3");

        let result = LootService::submit_offering(
            &mut store,
            &scope(),
            offering,
            UserId::from("u2"),
            WriteAuthority::Relay,
        )
        .unwrap();

        let Submission::Relayed(request) = result else {
            panic!("expected a relay request");
        };
        assert_eq!(request.action, "makeOffering");
        assert_eq!(request.payload["state"], "offering");
        assert!(store.get_flag(&scope(), "offerings").unwrap().is_none());
    }

    #[test]
    fn test_save_and_delete_record() {
        let mut store = MemoryFlagStore::new();
        let id = LootService::save_record(
            &mut store,
            &scope(),
            Trap {
                name: "Pit".into(),
                ..Trap::default()
            },
        )
        .unwrap();

        let removed: Trap = LootService::delete_record(&mut store, &scope(), &id).unwrap();
        assert_eq!(removed.name, "Pit");
        let err = LootService::delete_record::<Trap, _>(&mut store, &scope(), &id).unwrap_err();
        assert!(matches!(err, LootError::Record(records::RecordError::NotFound(_))));
    }

    #[test]
    fn test_close_dc_editor_deletes_malformed() {
        let mut store = MemoryFlagStore::new();
        let good = DcCheck {
            attribute: Some("skill:ath".into()),
            dc: Some(15),
            ..DcCheck::default()
        };
        let bad = DcCheck {
            attribute: Some("undefined".into()),
            ..DcCheck::default()
        };
        let good_id = LootService::save_record(&mut store, &scope(), good.clone()).unwrap();
        let bad_id = LootService::save_record(&mut store, &scope(), bad.clone()).unwrap();

        let good = DcCheck { id: Some(good_id), ..good };
        let bad = DcCheck { id: Some(bad_id), ..bad };
        assert!(!LootService::close_dc_editor(&mut store, &scope(), &good).unwrap());
        assert!(LootService::close_dc_editor(&mut store, &scope(), &bad).unwrap());
        assert!(!LootService::close_dc_editor(&mut store, &scope(), &DcCheck::default()).unwrap());

        let dcs: Vec<DcCheck> = records::load(&store, &scope()).unwrap();
        assert_eq!(dcs, vec![good]);
    }
}
