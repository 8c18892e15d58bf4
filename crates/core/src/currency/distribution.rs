//! Even distribution of a loot pool among characters.
//!
//! The distributor owns the undistributed pool, an immutable snapshot of the
//! original pool, the recipients' running holdings, and derived totals. Each
//! operation runs to completion and then reports to an optional observer,
//! which the caller uses to persist results and refresh its view.
//!
//! Invariant after every operation, for every denomination `d`:
//! `totals[d] == pool[d] + sum(held(r, d))` over recipients not excluded
//! from `d`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use coffer_shared::config::DistributionConfig;
use coffer_shared::types::{
    CoinAmount, CoinPurse, DenominationId, RecipientId, parse_whole_amount,
};

use super::conversion::convert_between;
use super::denomination::DenominationTable;

/// A character taking part in a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Character id.
    pub id: RecipientId,
    /// Display name.
    pub name: String,
    /// Portrait path, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Running holdings per denomination.
    #[serde(default)]
    pub currency: BTreeMap<DenominationId, CoinAmount>,
}

impl Recipient {
    /// Creates a recipient with no holdings.
    #[must_use]
    pub fn new(id: impl Into<RecipientId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: None,
            currency: BTreeMap::new(),
        }
    }

    /// Sets a holding (builder style).
    #[must_use]
    pub fn with_holding(mut self, denomination: impl Into<DenominationId>, amount: CoinAmount) -> Self {
        self.currency.insert(denomination.into(), amount);
        self
    }

    /// Returns the holding for a denomination (zero and included when absent).
    #[must_use]
    pub fn holding(&self, denomination: &DenominationId) -> CoinAmount {
        self.currency.get(denomination).copied().unwrap_or_default()
    }

    /// Returns what this recipient receives, counting exclusions as zero.
    #[must_use]
    pub fn payout(&self) -> CoinPurse {
        self.currency
            .iter()
            .map(|(id, amount)| (id.clone(), amount.held()))
            .collect()
    }
}

/// Which operation changed the distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionEvent {
    /// The pool was split evenly.
    Split {
        /// Whether remainders were converted downwards.
        converted: bool,
    },
    /// The whole pool was given to one recipient.
    Assigned(RecipientId),
    /// The pool and holdings were restored.
    Reset,
    /// A pool amount was edited by hand.
    PoolEdited(DenominationId),
    /// A recipient's holding was edited by hand.
    RecipientEdited {
        /// Edited recipient.
        recipient: RecipientId,
        /// Edited denomination.
        denomination: DenominationId,
    },
}

/// Snapshot of a distribution in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionState {
    /// Undistributed pool.
    pub pool: CoinPurse,
    /// Pool as it was when the distribution was opened.
    pub original: CoinPurse,
    /// Recipients and their running holdings.
    pub recipients: Vec<Recipient>,
    /// Pool plus every included holding, per denomination.
    pub totals: CoinPurse,
}

/// Final result of a distribution, ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionOutcome {
    /// What stays in the loot source.
    pub remainder: CoinPurse,
    /// What each recipient receives.
    pub payouts: Vec<(RecipientId, CoinPurse)>,
}

/// Receives a snapshot after every distributor operation.
pub trait DistributionObserver {
    /// Called once the operation has completed.
    fn on_update(&mut self, event: &DistributionEvent, state: &DistributionState);
}

impl<F> DistributionObserver for F
where
    F: FnMut(&DistributionEvent, &DistributionState),
{
    fn on_update(&mut self, event: &DistributionEvent, state: &DistributionState) {
        self(event, state);
    }
}

/// Splits a currency pool evenly among recipients.
pub struct CurrencyDistributor {
    table: DenominationTable,
    state: DistributionState,
    observer: Option<Box<dyn DistributionObserver>>,
}

impl CurrencyDistributor {
    /// Opens a distribution.
    ///
    /// Every table denomination gets a pool entry, and every recipient gets a
    /// zero holding for each pool denomination it does not already carry.
    /// Negative pool amounts are clamped to zero.
    #[must_use]
    pub fn new(table: DenominationTable, pool: CoinPurse, mut recipients: Vec<Recipient>) -> Self {
        let mut normalized = CoinPurse::new();
        for id in table.ids() {
            normalized.set(id.clone(), Decimal::ZERO);
        }
        for (id, amount) in pool.iter() {
            if amount.is_sign_negative() {
                warn!(denomination = %id, amount = %amount, "negative pool amount clamped to zero");
                normalized.set(id.clone(), Decimal::ZERO);
            } else {
                normalized.set(id.clone(), *amount);
            }
        }

        for recipient in &mut recipients {
            for id in normalized.ids() {
                recipient.currency.entry(id.clone()).or_default();
            }
        }

        let mut distributor = Self {
            table,
            state: DistributionState {
                original: normalized.clone(),
                pool: normalized,
                recipients,
                totals: CoinPurse::new(),
            },
            observer: None,
        };
        distributor.recompute(None);
        distributor
    }

    /// Opens a distribution and applies the configured auto-split.
    #[must_use]
    pub fn from_config(
        table: DenominationTable,
        pool: CoinPurse,
        recipients: Vec<Recipient>,
        settings: &DistributionConfig,
    ) -> Self {
        let mut distributor = Self::new(table, pool, recipients);
        if settings.auto_distribute {
            distributor.split_evenly(settings.convert_remainder);
        }
        distributor
    }

    /// Attaches the observer that is told about every operation.
    #[must_use]
    pub fn with_observer(mut self, observer: impl DistributionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Undistributed pool.
    #[must_use]
    pub fn pool(&self) -> &CoinPurse {
        &self.state.pool
    }

    /// Pool as it was when the distribution was opened.
    #[must_use]
    pub fn original(&self) -> &CoinPurse {
        &self.state.original
    }

    /// Current totals.
    #[must_use]
    pub fn totals(&self) -> &CoinPurse {
        &self.state.totals
    }

    /// Recipients and their holdings.
    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.state.recipients
    }

    /// Looks up a recipient.
    #[must_use]
    pub fn recipient(&self, id: &RecipientId) -> Option<&Recipient> {
        self.state.recipients.iter().find(|r| &r.id == id)
    }

    /// Full snapshot.
    #[must_use]
    pub fn state(&self) -> &DistributionState {
        &self.state
    }

    /// Denomination table in use.
    #[must_use]
    pub fn table(&self) -> &DenominationTable {
        &self.table
    }

    /// Remainder and payouts, ready to be written back.
    #[must_use]
    pub fn outcome(&self) -> DistributionOutcome {
        DistributionOutcome {
            remainder: self.state.pool.clone(),
            payouts: self
                .state
                .recipients
                .iter()
                .map(|r| (r.id.clone(), r.payout()))
                .collect(),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Splits every pool denomination evenly among its eligible recipients.
    ///
    /// Denominations are processed highest value first. What cannot be split
    /// stays in the pool, or, with `convert_remainder`, is converted into the
    /// next smaller denomination that has a rate and split along with it.
    pub fn split_evenly(&mut self, convert_remainder: bool) {
        let table = &self.table;
        let state = &mut self.state;

        for id in processing_order(table, &state.pool) {
            let amount = state.pool.amount(&id);
            if amount <= Decimal::ZERO {
                continue;
            }

            let eligible: Vec<usize> = state
                .recipients
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.holding(&id).is_excluded())
                .map(|(index, _)| index)
                .collect();
            if eligible.is_empty() {
                continue;
            }

            let count = Decimal::from(eligible.len());
            let share = (amount / count).floor();
            for index in eligible {
                let recipient = &mut state.recipients[index];
                let held = recipient.holding(&id).held();
                recipient
                    .currency
                    .insert(id.clone(), CoinAmount::Held(held + share));
            }

            let remainder = amount - share * count;
            state.pool.set(id.clone(), remainder);
            debug!(denomination = %id, share = %share, remainder = %remainder, "split denomination");

            if !convert_remainder || remainder <= Decimal::ZERO {
                continue;
            }
            let Some(index) = table.position(&id) else {
                continue;
            };
            let source = &table.as_slice()[index];
            if let Some(target) = table.next_convertible_after(index)
                && let Some(converted) = convert_between(remainder, source, target)
            {
                state.pool.set(id.clone(), Decimal::ZERO);
                state.pool.add(target.id.clone(), converted);
                debug!(from = %id, to = %target.id, amount = %converted, "converted remainder");
            }
        }

        self.recompute(None);
        self.notify(&DistributionEvent::Split {
            converted: convert_remainder,
        });
    }

    /// Gives the whole pool to one recipient and empties the pool.
    ///
    /// An excluded holding is re-included. Returns false, changing nothing,
    /// if the recipient is unknown.
    pub fn assign_remainder(&mut self, recipient_id: &RecipientId) -> bool {
        let table = &self.table;
        let state = &mut self.state;

        let Some(recipient) = state.recipients.iter_mut().find(|r| &r.id == recipient_id) else {
            debug!(recipient = %recipient_id, "assign ignored for unknown recipient");
            return false;
        };

        for id in processing_order(table, &state.pool) {
            let amount = state.pool.amount(&id);
            let held = recipient.holding(&id).held();
            recipient.currency.insert(id.clone(), CoinAmount::Held(held + amount));
            state.pool.set(id, Decimal::ZERO);
        }

        self.recompute(None);
        self.notify(&DistributionEvent::Assigned(recipient_id.clone()));
        true
    }

    /// Restores the original pool and zeroes every holding, re-including
    /// excluded recipients.
    pub fn reset_to_original(&mut self) {
        self.state.pool = self.state.original.clone();
        let ids: Vec<DenominationId> = self.state.pool.ids().cloned().collect();
        for recipient in &mut self.state.recipients {
            for amount in recipient.currency.values_mut() {
                *amount = CoinAmount::ZERO;
            }
            for id in &ids {
                recipient.currency.insert(id.clone(), CoinAmount::ZERO);
            }
        }

        self.recompute(None);
        self.notify(&DistributionEvent::Reset);
    }

    /// Applies a hand-edited amount.
    ///
    /// With no recipient the pool is edited: empty, invalid, or negative input
    /// stores zero. For a recipient, empty input excludes them from this
    /// denomination; invalid or negative input is ignored and the previous
    /// value kept. Returns false when nothing changed.
    pub fn set_manual_amount(
        &mut self,
        recipient_id: Option<&RecipientId>,
        denomination: &DenominationId,
        raw: &str,
    ) -> bool {
        let event = match recipient_id {
            None => {
                let amount = match parse_whole_amount(raw) {
                    Some(value) if !value.is_sign_negative() => value,
                    _ => {
                        if !raw.trim().is_empty() {
                            warn!(denomination = %denomination, input = raw, "invalid pool amount treated as zero");
                        }
                        Decimal::ZERO
                    }
                };
                self.state.pool.set(denomination.clone(), amount);
                DistributionEvent::PoolEdited(denomination.clone())
            }
            Some(recipient_id) => {
                let Some(recipient) = self
                    .state
                    .recipients
                    .iter_mut()
                    .find(|r| &r.id == recipient_id)
                else {
                    debug!(recipient = %recipient_id, "edit ignored for unknown recipient");
                    return false;
                };

                let amount = if raw.trim().is_empty() {
                    CoinAmount::Excluded
                } else {
                    match parse_whole_amount(raw) {
                        Some(value) if !value.is_sign_negative() => CoinAmount::Held(value),
                        _ => {
                            warn!(
                                recipient = %recipient_id,
                                denomination = %denomination,
                                input = raw,
                                "invalid holding ignored"
                            );
                            return false;
                        }
                    }
                };
                recipient.currency.insert(denomination.clone(), amount);
                DistributionEvent::RecipientEdited {
                    recipient: recipient_id.clone(),
                    denomination: denomination.clone(),
                }
            }
        };

        self.recompute(Some(denomination));
        self.notify(&event);
        true
    }

    /// Recomputes totals for one denomination, or for all of them.
    pub fn compute_totals(&mut self, denomination: Option<&DenominationId>) -> &CoinPurse {
        self.recompute(denomination);
        &self.state.totals
    }

    fn recompute(&mut self, denomination: Option<&DenominationId>) {
        let ids = match denomination {
            Some(id) => vec![id.clone()],
            None => processing_order(&self.table, &self.state.pool),
        };

        for id in ids {
            let total = self
                .state
                .recipients
                .iter()
                .filter_map(|r| r.holding(&id).value())
                .fold(self.state.pool.amount(&id), |acc, held| acc + held);
            self.state.totals.set(id, total);
        }
    }

    fn notify(&mut self, event: &DistributionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_update(event, &self.state);
        }
    }
}

/// Table denominations in value order, then any pool-only denominations.
fn processing_order(table: &DenominationTable, pool: &CoinPurse) -> Vec<DenominationId> {
    let mut order: Vec<DenominationId> = table.ids().cloned().collect();
    for id in pool.ids() {
        if table.get(id).is_none() {
            order.push(id.clone());
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use coffer_shared::types::Denomination;
    use rust_decimal_macros::dec;

    fn id(s: &str) -> DenominationId {
        DenominationId::from(s)
    }

    fn rid(s: &str) -> RecipientId {
        RecipientId::from(s)
    }

    fn gold_only() -> DenominationTable {
        DenominationTable::new(vec![Denomination::new("gold", "Gold", None)])
    }

    fn gold_silver() -> DenominationTable {
        DenominationTable::new(vec![
            Denomination::new("gold", "Gold", None),
            Denomination::new("silver", "Silver", Some(dec!(10))),
        ])
    }

    fn purse(entries: &[(&str, Decimal)]) -> CoinPurse {
        entries.iter().map(|(k, v)| (id(k), *v)).collect()
    }

    fn party(n: usize) -> Vec<Recipient> {
        (0..n)
            .map(|i| Recipient::new(format!("pc{i}"), format!("PC {i}")))
            .collect()
    }

    // =========================================================================
    // split_evenly
    // =========================================================================

    #[test]
    fn test_even_split_leaves_remainder() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(10))]), party(3));
        d.split_evenly(false);

        for r in d.recipients() {
            assert_eq!(r.holding(&id("gold")), CoinAmount::Held(dec!(3)));
        }
        assert_eq!(d.pool().amount(&id("gold")), dec!(1));
        assert_eq!(d.totals().amount(&id("gold")), dec!(10));
    }

    #[test]
    fn test_split_respects_exclusion() {
        let recipients = vec![
            Recipient::new("a", "A").with_holding("gold", CoinAmount::ZERO),
            Recipient::new("b", "B").with_holding("gold", CoinAmount::Excluded),
            Recipient::new("c", "C").with_holding("gold", CoinAmount::ZERO),
        ];
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(9))]), recipients);
        d.split_evenly(false);

        assert_eq!(d.recipient(&rid("a")).unwrap().holding(&id("gold")), CoinAmount::Held(dec!(4)));
        assert_eq!(d.recipient(&rid("b")).unwrap().holding(&id("gold")), CoinAmount::Excluded);
        assert_eq!(d.recipient(&rid("c")).unwrap().holding(&id("gold")), CoinAmount::Held(dec!(4)));
        assert_eq!(d.pool().amount(&id("gold")), dec!(1));
    }

    #[test]
    fn test_split_with_no_eligible_recipients_keeps_pool() {
        let recipients = vec![Recipient::new("a", "A").with_holding("gold", CoinAmount::Excluded)];
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(7))]), recipients);
        d.split_evenly(true);
        assert_eq!(d.pool().amount(&id("gold")), dec!(7));
    }

    #[test]
    fn test_split_with_no_recipients_is_safe() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(7))]), vec![]);
        d.split_evenly(true);
        assert_eq!(d.pool().amount(&id("gold")), dec!(7));
        assert_eq!(d.totals().amount(&id("gold")), dec!(7));
    }

    #[test]
    fn test_remainder_converts_to_silver() {
        // 1 gold cannot be split between 2; it becomes 10 silver, 5 each.
        let mut d = CurrencyDistributor::new(
            gold_silver(),
            purse(&[("gold", dec!(1)), ("silver", dec!(0))]),
            party(2),
        );
        d.split_evenly(true);

        assert_eq!(d.pool().amount(&id("gold")), dec!(0));
        assert_eq!(d.pool().amount(&id("silver")), dec!(0));
        for r in d.recipients() {
            assert_eq!(r.holding(&id("gold")), CoinAmount::Held(dec!(0)));
            assert_eq!(r.holding(&id("silver")), CoinAmount::Held(dec!(5)));
        }
    }

    #[test]
    fn test_remainder_converts_when_target_has_no_recipients() {
        // Nobody takes silver, so the converted remainder waits in the pool.
        let recipients = vec![
            Recipient::new("a", "A").with_holding("silver", CoinAmount::Excluded),
            Recipient::new("b", "B").with_holding("silver", CoinAmount::Excluded),
        ];
        let mut d = CurrencyDistributor::new(gold_silver(), purse(&[("gold", dec!(3))]), recipients);
        d.split_evenly(true);

        assert_eq!(d.pool().amount(&id("gold")), dec!(0));
        assert_eq!(d.pool().amount(&id("silver")), dec!(10));
        assert_eq!(d.recipients()[0].holding(&id("gold")).held(), dec!(1));
        assert_eq!(d.totals().amount(&id("silver")), dec!(10));
    }

    #[test]
    fn test_zero_rate_target_keeps_remainder() {
        let table = DenominationTable::new(vec![
            Denomination::new("gold", "Gold", None),
            Denomination::new("silver", "Silver", Some(Decimal::ZERO)),
        ]);
        let mut d = CurrencyDistributor::new(table, purse(&[("gold", dec!(5))]), party(2));
        d.split_evenly(true);

        assert_eq!(d.pool().amount(&id("gold")), dec!(1));
        assert_eq!(d.pool().amount(&id("silver")), dec!(0));
        let given: Decimal = d.recipients().iter().map(|r| r.holding(&id("gold")).held()).sum();
        assert_eq!(given + d.pool().amount(&id("gold")), dec!(5));
    }

    #[test]
    fn test_remainder_stays_without_conversion() {
        let mut d = CurrencyDistributor::new(gold_silver(), purse(&[("gold", dec!(1))]), party(2));
        d.split_evenly(false);
        assert_eq!(d.pool().amount(&id("gold")), dec!(1));
        assert_eq!(d.pool().amount(&id("silver")), dec!(0));
    }

    #[test]
    fn test_cascade_in_single_pass() {
        // 1 pp over 3 -> 10 gp -> 3 each, 1 gp -> 2 ep -> 0 each, 2 ep -> 10 sp -> 3 each, 1 sp -> 10 cp -> 3 each, 1 cp left.
        let mut d = CurrencyDistributor::new(
            DenominationTable::defaults(),
            purse(&[("pp", dec!(1))]),
            party(3),
        );
        d.split_evenly(true);

        let r = &d.recipients()[0];
        assert_eq!(r.holding(&id("pp")).held(), dec!(0));
        assert_eq!(r.holding(&id("gp")).held(), dec!(3));
        assert_eq!(r.holding(&id("ep")).held(), dec!(0));
        assert_eq!(r.holding(&id("sp")).held(), dec!(3));
        assert_eq!(r.holding(&id("cp")).held(), dec!(3));
        assert_eq!(d.pool().amount(&id("cp")), dec!(1));
        assert!(d.pool().iter().filter(|(k, _)| k.as_str() != "cp").all(|(_, v)| v.is_zero()));
    }

    #[test]
    fn test_pool_only_denomination_is_split_without_conversion() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gems", dec!(5))]), party(2));
        d.split_evenly(true);
        assert_eq!(d.pool().amount(&id("gems")), dec!(1));
        assert_eq!(d.recipients()[1].holding(&id("gems")).held(), dec!(2));
    }

    // =========================================================================
    // assign / reset / manual edits
    // =========================================================================

    #[test]
    fn test_assign_remainder_moves_whole_pool() {
        let mut d = CurrencyDistributor::new(
            gold_silver(),
            purse(&[("gold", dec!(10)), ("silver", dec!(4))]),
            party(3),
        );
        d.split_evenly(false);
        let before = d.totals().clone();
        let pool_before = d.pool().clone();

        assert!(d.assign_remainder(&rid("pc1")));

        assert!(d.pool().is_all_zero());
        let r = d.recipient(&rid("pc1")).unwrap();
        assert_eq!(r.holding(&id("gold")).held(), dec!(3) + pool_before.amount(&id("gold")));
        assert_eq!(r.holding(&id("silver")).held(), dec!(1) + pool_before.amount(&id("silver")));
        assert_eq!(d.totals(), &before);
    }

    #[test]
    fn test_assign_reincludes_excluded_holding() {
        let recipients = vec![Recipient::new("a", "A").with_holding("gold", CoinAmount::Excluded)];
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(4))]), recipients);
        assert!(d.assign_remainder(&rid("a")));
        assert_eq!(d.recipients()[0].holding(&id("gold")), CoinAmount::Held(dec!(4)));
        assert_eq!(d.totals().amount(&id("gold")), dec!(4));
    }

    #[test]
    fn test_assign_unknown_recipient_is_noop() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(4))]), party(1));
        assert!(!d.assign_remainder(&rid("nobody")));
        assert_eq!(d.pool().amount(&id("gold")), dec!(4));
    }

    #[test]
    fn test_reset_restores_original_and_reincludes() {
        let mut recipients = party(2);
        recipients[0].currency.insert(id("gold"), CoinAmount::Excluded);
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(9))]), recipients);
        d.split_evenly(false);
        d.set_manual_amount(None, &id("gold"), "100");

        d.reset_to_original();
        let once = d.state().clone();
        d.reset_to_original();

        assert_eq!(d.state(), &once);
        assert_eq!(d.pool().amount(&id("gold")), dec!(9));
        for r in d.recipients() {
            assert_eq!(r.holding(&id("gold")), CoinAmount::ZERO);
        }
    }

    #[test]
    fn test_manual_pool_edit() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(9))]), party(1));
        assert!(d.set_manual_amount(None, &id("gold"), "25"));
        assert_eq!(d.pool().amount(&id("gold")), dec!(25));
        assert_eq!(d.totals().amount(&id("gold")), dec!(25));

        assert!(d.set_manual_amount(None, &id("gold"), ""));
        assert_eq!(d.pool().amount(&id("gold")), dec!(0));

        assert!(d.set_manual_amount(None, &id("gold"), "junk"));
        assert_eq!(d.pool().amount(&id("gold")), dec!(0));

        assert!(d.set_manual_amount(None, &id("gold"), "-5"));
        assert_eq!(d.pool().amount(&id("gold")), dec!(0));
    }

    #[test]
    fn test_manual_recipient_edit() {
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(9))]), party(2));
        assert!(d.set_manual_amount(Some(&rid("pc0")), &id("gold"), "6"));
        assert_eq!(d.totals().amount(&id("gold")), dec!(15));

        assert!(d.set_manual_amount(Some(&rid("pc0")), &id("gold"), ""));
        assert_eq!(d.recipients()[0].holding(&id("gold")), CoinAmount::Excluded);
        assert_eq!(d.totals().amount(&id("gold")), dec!(9));

        assert!(!d.set_manual_amount(Some(&rid("pc1")), &id("gold"), "x"));
        assert_eq!(d.recipients()[1].holding(&id("gold")), CoinAmount::ZERO);

        assert!(!d.set_manual_amount(Some(&rid("ghost")), &id("gold"), "3"));
    }

    #[test]
    fn test_negative_pool_clamped_on_open() {
        let d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(-3))]), party(1));
        assert_eq!(d.pool().amount(&id("gold")), dec!(0));
        assert_eq!(d.original().amount(&id("gold")), dec!(0));
    }

    #[test]
    fn test_auto_distribute_from_config() {
        let settings = DistributionConfig {
            auto_distribute: true,
            convert_remainder: false,
        };
        let d = CurrencyDistributor::from_config(
            gold_only(),
            purse(&[("gold", dec!(4))]),
            party(2),
            &settings,
        );
        assert!(d.pool().is_all_zero());

        let manual = DistributionConfig {
            auto_distribute: false,
            convert_remainder: true,
        };
        let d = CurrencyDistributor::from_config(gold_only(), purse(&[("gold", dec!(4))]), party(2), &manual);
        assert_eq!(d.pool().amount(&id("gold")), dec!(4));
    }

    #[test]
    fn test_observer_sees_each_operation() {
        let seen: Rc<RefCell<Vec<DistributionEvent>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(4))]), party(2))
            .with_observer(move |event: &DistributionEvent, state: &DistributionState| {
                assert_eq!(state.totals.amount(&DenominationId::from("gold")), dec!(4));
                sink.borrow_mut().push(event.clone());
            });

        d.split_evenly(true);
        d.assign_remainder(&rid("pc0"));
        d.reset_to_original();

        assert_eq!(
            *seen.borrow(),
            vec![
                DistributionEvent::Split { converted: true },
                DistributionEvent::Assigned(rid("pc0")),
                DistributionEvent::Reset,
            ]
        );
    }

    #[test]
    fn test_outcome_counts_exclusions_as_zero() {
        let mut recipients = party(2);
        recipients[1].currency.insert(id("gold"), CoinAmount::Excluded);
        let mut d = CurrencyDistributor::new(gold_only(), purse(&[("gold", dec!(5))]), recipients);
        d.split_evenly(false);

        let outcome = d.outcome();
        assert_eq!(outcome.remainder.amount(&id("gold")), dec!(0));
        assert_eq!(outcome.payouts[0].1.amount(&id("gold")), dec!(5));
        assert_eq!(outcome.payouts[1].1.amount(&id("gold")), dec!(0));
    }
}
