//! Property-based tests for ordering.
//!
//! - Property 1: Reordering keeps orders a permutation of 0..n
//! - Property 2: The moved field lands on the target order
//! - Property 3: `move_item` keeps the same multiset of elements

use proptest::prelude::*;

use coffer_shared::types::RecordId;

use super::fields::{OrderedFields, PageField};
use super::list::move_item;

fn fields(n: i64) -> OrderedFields {
    (0..n)
        .map(|order| PageField {
            id: RecordId::new(format!("f{order}")),
            name: format!("Field {order}"),
            shown: true,
            full: false,
            order,
        })
        .collect()
}

proptest! {
    /// Property 1: any sequence of reorders leaves orders 0..n.
    #[test]
    fn prop_reorder_is_permutation(
        n in 1i64..12,
        moves in prop::collection::vec((0i64..12, 0i64..12), 0..20),
    ) {
        let mut f = fields(n);
        for (from, to) in moves {
            f.reorder(from % n, to % n);
        }
        let orders: Vec<i64> = f.sorted().iter().map(|p| p.order).collect();
        prop_assert_eq!(orders, (0..n).collect::<Vec<_>>());
    }

    /// Property 2: the field that was at `from` ends at `to`.
    #[test]
    fn prop_reorder_moves_field(n in 1i64..12, from in 0i64..12, to in 0i64..12) {
        let (from, to) = (from % n, to % n);
        let mut f = fields(n);
        f.reorder(from, to);
        let moved = RecordId::new(format!("f{from}"));
        prop_assert_eq!(f.get(&moved).map(|p| p.order), Some(to));
    }

    /// Property 3: reordering a list never loses or duplicates elements.
    #[test]
    fn prop_move_item_preserves_elements(
        list in prop::collection::vec(any::<u8>(), 0..16),
        from in 0usize..20,
        to in 0usize..20,
    ) {
        let mut moved = list.clone();
        move_item(&mut moved, from, to);
        let mut a = list;
        let mut b = moved;
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }
}
