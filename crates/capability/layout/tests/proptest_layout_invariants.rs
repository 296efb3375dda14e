//! 网格布局核心的属性测试。
//!
//! 1. 坐标往返：to_index(to_coord(i, c), c) == i
//! 2. 双次切换：toggle(toggle(S, i), i) == S
//! 3. 选区永不重复
//! 4. 序列化确定性，且标记往返像素一致
//! 5. 包围盒覆盖所有矩形
//! 6. 入住率始终在 0..=100

use domain::{OccupancyFact, PaymentStatus};
use pms_layout::{
    Grid, MarkupStyle, SelectionSet, UnitDefaults, build_units, parse_rects, render_markup,
    resolve_display, serialize, to_coord, to_index,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_selection() -> impl Strategy<Value = SelectionSet> {
    proptest::collection::vec(0u32..64, 0..40).prop_map(|cells| {
        cells
            .into_iter()
            .fold(SelectionSet::new(), |selection, cell| selection.add(cell))
    })
}

proptest! {
    #[test]
    fn coordinate_round_trip(index in 0u32..1_000_000, cols in 1u32..512) {
        let (row, col) = to_coord(index, cols);
        prop_assert!(col < cols);
        prop_assert_eq!(to_index(row, col, cols), index);
    }

    #[test]
    fn double_toggle_restores_selection(selection in arb_selection(), index in 0u32..64) {
        let original = selection.clone();
        let restored = selection.toggle(index).toggle(index);
        if original.contains(index) {
            // 已选格子被移除后重新追加到末尾，其余顺序不变。
            let mut expected: Vec<u32> =
                original.cells().iter().copied().filter(|cell| *cell != index).collect();
            expected.push(index);
            prop_assert_eq!(restored.cells(), expected.as_slice());
        } else {
            prop_assert_eq!(restored, original);
        }
    }

    #[test]
    fn toggles_never_duplicate(ops in proptest::collection::vec(0u32..16, 0..64)) {
        let selection = ops
            .into_iter()
            .fold(SelectionSet::new(), |selection, cell| selection.toggle(cell));
        let unique: HashSet<u32> = selection.cells().iter().copied().collect();
        prop_assert_eq!(unique.len(), selection.len());
    }

    #[test]
    fn serialization_is_stable(selection in arb_selection(), size in 1u32..128) {
        let grid = Grid::default();
        let first = serialize(&selection, &grid, size).expect("serialize");
        let second = serialize(&selection, &grid, size).expect("serialize");
        prop_assert_eq!(&first, &second);
        let markup = render_markup(&first, MarkupStyle::Labelled);
        prop_assert_eq!(&markup, &render_markup(&second, MarkupStyle::Labelled));
        prop_assert_eq!(parse_rects(&markup).expect("parse"), first.rects);
    }

    #[test]
    fn bounds_cover_every_rect(selection in arb_selection(), size in 1u32..64) {
        let layout = serialize(&selection, &Grid::default(), size).expect("serialize");
        let (origin_x, origin_y) = layout.origin();
        for rect in &layout.rects {
            prop_assert!(rect.x >= origin_x && rect.y >= origin_y);
            prop_assert!(rect.x + rect.width <= origin_x + layout.layout_width());
            prop_assert!(rect.y + rect.height <= origin_y + layout.layout_height());
        }
        prop_assert_eq!(layout.bounds.is_none(), selection.is_empty());
    }

    #[test]
    fn occupancy_rate_stays_in_range(
        selection in arb_selection(),
        occupied in proptest::collection::vec(0u32..64, 0..64),
    ) {
        let units = build_units(&selection, 0, &UnitDefaults::default());
        let facts: Vec<OccupancyFact> = occupied
            .iter()
            .enumerate()
            .map(|(idx, cell)| OccupancyFact {
                occupancy_id: format!("o-{idx}"),
                unit_id: Some(*cell),
                unit_name: None,
                floor_number: Some(0),
                tenant_ref: format!("t-{idx}"),
                rent_amount: 1.0,
                payment_status: Some(PaymentStatus::Paid),
            })
            .collect();
        let state = resolve_display(&units, &facts);
        prop_assert!(state.occupancy_rate <= 100);
        prop_assert!(state.occupied_count <= state.total_units);
        prop_assert_eq!(state.units.len(), units.len());
    }
}
