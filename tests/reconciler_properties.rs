//! Property-based tests for quantity reconciliation.
//!
//! These check invariants that must hold for every pack size and every
//! sequence of edits, not just the worked examples in the unit tests.

use std::num::NonZeroU32;

use bigdecimal::BigDecimal;
use order_desk::domain::reconciler::{
    apply_edit, apply_edit_value, recompute_grand_total, EditKind, OrderLine,
};
use order_desk::domain::product::Product;
use proptest::prelude::*;
use uuid::Uuid;

fn product(rate: u32, pack_size: Option<u32>) -> Product {
    Product {
        id: Uuid::new_v4(),
        seller_id: Uuid::new_v4(),
        name: "Widget".to_string(),
        rate: BigDecimal::from(rate),
        mrp: BigDecimal::from(rate),
        pack_size: pack_size.and_then(NonZeroU32::new),
    }
}

fn edit_kind() -> impl Strategy<Value = EditKind> {
    prop_oneof![Just(EditKind::Pieces), Just(EditKind::Cartons)]
}

proptest! {
    /// Loose pieces never reach a full carton, whatever edits are applied.
    #[test]
    fn pieces_stay_below_pack_size(
        pack in 1u32..50,
        edits in prop::collection::vec((edit_kind(), -5i64..500), 1..20)
    ) {
        let p = product(3, Some(pack));
        let mut line = OrderLine::new(p.id);
        for (kind, value) in edits {
            line = apply_edit_value(&line, &p, kind, value);
            prop_assert!(line.pieces < pack);
        }
    }

    /// A pieces edit keeps the cartons already on the line and adds the new pieces.
    #[test]
    fn pieces_edit_conserves_quantity(
        pack in 1u32..50,
        cartons in 0u32..100,
        raw in 0u32..1000
    ) {
        let p = product(1, Some(pack));
        let line = OrderLine::from_quantities(&p, 0, cartons);
        let next = apply_edit(&line, &p, EditKind::Pieces, &raw.to_string());
        let expected = u64::from(raw) + u64::from(cartons) * u64::from(pack);
        prop_assert_eq!(next.total_pieces(p.pack_size), expected);
    }

    /// A cartons edit keeps the loose pieces and replaces the cartons.
    #[test]
    fn cartons_edit_conserves_quantity(
        pack in 1u32..50,
        pieces in 0u32..1000,
        raw in 0u32..100
    ) {
        let p = product(1, Some(pack));
        let line = OrderLine::from_quantities(&p, pieces, 0);
        let loose = line.pieces;
        let next = apply_edit(&line, &p, EditKind::Cartons, &raw.to_string());
        prop_assert_eq!(next.pieces, loose);
        prop_assert_eq!(next.cartons, raw);
        prop_assert_eq!(
            next.total_pieces(p.pack_size),
            u64::from(loose) + u64::from(raw) * u64::from(pack)
        );
    }

    /// Re-entering the same value does not change the result. For pieces this
    /// holds while the value fits inside one carton; larger values carry over
    /// on every entry.
    #[test]
    fn repeated_edit_is_idempotent(
        pack in 2u32..50,
        start_pieces in 0u32..500,
        start_cartons in 0u32..50,
        kind in edit_kind(),
        raw in 0u32..500
    ) {
        let raw = match kind {
            EditKind::Pieces => raw % pack,
            EditKind::Cartons => raw,
        };
        let p = product(7, Some(pack));
        let line = OrderLine::from_quantities(&p, start_pieces, start_cartons);
        let once = apply_edit(&line, &p, kind, &raw.to_string());
        let twice = apply_edit(&once, &p, kind, &raw.to_string());
        prop_assert_eq!(once, twice);
    }

    /// Without a pack size, pieces are taken verbatim and cartons stay zero.
    #[test]
    fn pieces_only_products_pass_through(
        edits in prop::collection::vec((edit_kind(), 0u32..10_000), 1..20)
    ) {
        let p = product(2, None);
        let mut line = OrderLine::new(p.id);
        let mut last_pieces = 0;
        for (kind, raw) in edits {
            line = apply_edit(&line, &p, kind, &raw.to_string());
            if kind == EditKind::Pieces {
                last_pieces = raw;
            }
            prop_assert_eq!(line.cartons, 0);
            prop_assert_eq!(line.pieces, last_pieces);
        }
    }

    /// Negative input changes nothing but the invalid flag.
    #[test]
    fn negative_input_is_rejected(
        pack in prop::option::of(1u32..50),
        pieces in 0u32..500,
        cartons in 0u32..50,
        kind in edit_kind(),
        raw in i64::MIN..0
    ) {
        let p = product(4, pack);
        let before = OrderLine::from_quantities(&p, pieces, cartons);
        let after = apply_edit(&before, &p, kind, &raw.to_string());
        prop_assert!(after.invalid);
        prop_assert_eq!(after.pieces, before.pieces);
        prop_assert_eq!(after.cartons, before.cartons);
        prop_assert_eq!(after.line_total, before.line_total);
    }

    /// Line totals follow the catalog rate.
    #[test]
    fn line_total_is_quantity_times_rate(
        pack in prop::option::of(1u32..50),
        rate in 0u32..1000,
        pieces in 0u32..500,
        cartons in 0u32..50
    ) {
        let p = product(rate, pack);
        let line = OrderLine::from_quantities(&p, pieces, cartons);
        let expected = BigDecimal::from(line.total_pieces(p.pack_size)) * BigDecimal::from(rate);
        prop_assert_eq!(line.line_total, expected);
    }

    /// The grand total is the sum of the line totals, and removing a line
    /// takes away exactly that line's total.
    #[test]
    fn grand_total_is_additive(
        quantities in prop::collection::vec((1u32..100, 0u32..40, prop::option::of(1u32..24)), 1..10),
        remove in any::<prop::sample::Index>()
    ) {
        let mut lines: Vec<OrderLine> = quantities
            .iter()
            .map(|(rate, pieces, pack)| {
                let p = product(*rate, *pack);
                OrderLine::from_quantities(&p, *pieces, 1)
            })
            .collect();
        let sum = lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + &l.line_total);
        let total = recompute_grand_total(&lines);
        prop_assert_eq!(&total, &sum);

        let removed = lines.remove(remove.index(lines.len()));
        prop_assert_eq!(recompute_grand_total(&lines), total - removed.line_total);
    }
}
