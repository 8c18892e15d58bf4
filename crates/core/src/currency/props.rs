//! Property-based tests for currency distribution.
//!
//! - Property 1: Conservation of totals across a split
//! - Property 2: Even shares with bounded remainder
//! - Property 3: Conversion conserves base value
//! - Property 4: Assign-all empties the pool without changing totals
//! - Property 5: Reset is idempotent

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use coffer_shared::types::{CoinAmount, CoinPurse, Denomination, DenominationId, RecipientId};

use super::conversion::base_value;
use super::denomination::DenominationTable;
use super::distribution::{CurrencyDistributor, Recipient};

fn table() -> DenominationTable {
    DenominationTable::new(vec![
        Denomination::new("gp", "Gold", None),
        Denomination::new("sp", "Silver", Some(dec!(10))),
        Denomination::new("cp", "Copper", Some(dec!(100))),
    ])
}

/// Strategy for a pool of up to 10,000 of each coin.
fn pool() -> impl Strategy<Value = CoinPurse> {
    (0i64..10_000, 0i64..10_000, 0i64..10_000).prop_map(|(gp, sp, cp)| {
        [
            (DenominationId::from("gp"), Decimal::from(gp)),
            (DenominationId::from("sp"), Decimal::from(sp)),
            (DenominationId::from("cp"), Decimal::from(cp)),
        ]
        .into_iter()
        .collect()
    })
}

/// Strategy for 0-7 recipients, each possibly excluded per denomination.
fn recipients() -> impl Strategy<Value = Vec<Recipient>> {
    prop::collection::vec(prop::array::uniform3(any::<bool>()), 0..7).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, excluded)| {
                let mut recipient = Recipient::new(format!("pc{i}"), format!("PC {i}"));
                for (id, skip) in ["gp", "sp", "cp"].iter().zip(excluded) {
                    if skip {
                        recipient = recipient.with_holding(*id, CoinAmount::Excluded);
                    }
                }
                recipient
            })
            .collect()
    })
}

fn base_total(distributor: &CurrencyDistributor) -> Decimal {
    distributor
        .table()
        .iter()
        .map(|d| base_value(distributor.totals().amount(&d.id), d))
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1: without conversion, every denomination's total is unchanged.
    #[test]
    fn prop_split_conserves_totals(pool in pool(), recipients in recipients()) {
        let mut distributor = CurrencyDistributor::new(table(), pool, recipients);
        let before = distributor.totals().clone();

        distributor.split_evenly(false);

        prop_assert_eq!(distributor.totals(), &before);
    }

    /// Property 2: eligible recipients get equal shares and the remainder is
    /// smaller than the number of eligible recipients.
    #[test]
    fn prop_split_is_even(pool in pool(), recipients in recipients()) {
        let mut distributor = CurrencyDistributor::new(table(), pool.clone(), recipients);
        distributor.split_evenly(false);

        for d in table().iter() {
            let eligible: Vec<Decimal> = distributor
                .recipients()
                .iter()
                .filter_map(|r| r.holding(&d.id).value())
                .collect();
            let remainder = distributor.pool().amount(&d.id);

            if eligible.is_empty() {
                prop_assert_eq!(remainder, pool.amount(&d.id));
                continue;
            }
            prop_assert!(eligible.iter().all(|share| *share == eligible[0]));
            prop_assert!(remainder < Decimal::from(eligible.len()));
            prop_assert!(remainder >= Decimal::ZERO);
        }
    }

    /// Property 3: with conversion, value measured in gold is unchanged.
    #[test]
    fn prop_conversion_conserves_value(pool in pool(), recipients in recipients()) {
        let mut distributor = CurrencyDistributor::new(table(), pool, recipients);
        let before = base_total(&distributor);

        distributor.split_evenly(true);

        prop_assert_eq!(base_total(&distributor), before);
    }

    /// Property 4: assigning the remainder empties the pool, totals unchanged.
    #[test]
    fn prop_assign_empties_pool(pool in pool(), recipients in recipients(), convert in any::<bool>()) {
        prop_assume!(!recipients.is_empty());
        let target = RecipientId::from("pc0");
        let mut distributor = CurrencyDistributor::new(table(), pool, recipients);
        distributor.split_evenly(convert);

        let pool_before = distributor.pool().clone();
        let held_before = distributor.recipient(&target).unwrap().payout();
        let totals_before = base_total(&distributor);

        prop_assert!(distributor.assign_remainder(&target));

        prop_assert!(distributor.pool().is_all_zero());
        let held_after = distributor.recipient(&target).unwrap().payout();
        for d in table().iter() {
            prop_assert_eq!(
                held_after.amount(&d.id),
                held_before.amount(&d.id) + pool_before.amount(&d.id)
            );
        }
        prop_assert_eq!(base_total(&distributor), totals_before);
    }

    /// Property 5: resetting twice equals resetting once, and restores the pool.
    #[test]
    fn prop_reset_idempotent(pool in pool(), recipients in recipients()) {
        let mut distributor = CurrencyDistributor::new(table(), pool, recipients);
        distributor.split_evenly(true);

        distributor.reset_to_original();
        let once = distributor.state().clone();
        distributor.reset_to_original();

        prop_assert_eq!(distributor.state(), &once);
        prop_assert_eq!(distributor.pool(), distributor.original());
    }
}
