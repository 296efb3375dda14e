use pms_layout::{
    BoundingBox, Grid, LayoutError, MarkupStyle, SelectionSet, parse_rects, render_markup,
    serialize,
};

fn selection(cells: &[u32]) -> SelectionSet {
    SelectionSet::from_cells(cells.iter().copied()).expect("cells")
}

#[test]
fn rects_follow_grid_position_and_selection_order() {
    let layout = serialize(&selection(&[0, 9, 17]), &Grid::default(), 60).expect("serialize");
    let placed: Vec<(String, u32, u32, u32)> = layout
        .rects
        .iter()
        .map(|rect| (rect.element_id.clone(), rect.x, rect.y, rect.label))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("cell-0".to_string(), 0, 0, 1),
            ("cell-9".to_string(), 60, 60, 2),
            ("cell-17".to_string(), 60, 120, 3),
        ]
    );
    assert!(layout.rects.iter().all(|rect| rect.width == 60 && rect.height == 60));
}

#[test]
fn bounding_box_trims_viewport() {
    let layout = serialize(&selection(&[0, 9, 17]), &Grid::default(), 60).expect("serialize");
    assert_eq!(
        layout.bounds,
        Some(BoundingBox {
            min_row: 0,
            max_row: 2,
            min_col: 0,
            max_col: 1,
        })
    );
    assert_eq!(layout.layout_width(), 120);
    assert_eq!(layout.layout_height(), 180);
    assert_eq!(layout.origin(), (0, 0));
}

#[test]
fn label_is_sequence_position_not_cell_index() {
    let layout = serialize(&selection(&[42, 3]), &Grid::default(), 10).expect("serialize");
    assert_eq!(layout.rects[0].cell, 42);
    assert_eq!(layout.rects[0].label, 1);
    assert_eq!(layout.rects[1].label, 2);
    assert_eq!(layout.origin(), (20, 0));
}

#[test]
fn empty_selection_serializes_to_nothing() {
    let layout = serialize(&SelectionSet::new(), &Grid::default(), 60).expect("serialize");
    assert!(layout.is_empty());
    assert!(layout.bounds.is_none());
    assert_eq!(layout.layout_width(), 0);
    assert_eq!(layout.layout_height(), 0);
    let markup = render_markup(&layout, MarkupStyle::Labelled);
    assert_eq!(
        markup,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 0 0\" width=\"0\" height=\"0\">\n</svg>"
    );
    assert!(parse_rects(&markup).expect("parse").is_empty());
}

#[test]
fn labelled_markup_has_centered_text() {
    let layout = serialize(&selection(&[9]), &Grid::default(), 60).expect("serialize");
    let markup = render_markup(&layout, MarkupStyle::Labelled);
    let expected = [
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"60 60 60 60\" width=\"60\" height=\"60\">",
        "<rect id=\"cell-9\" x=\"60\" y=\"60\" width=\"60\" height=\"60\"/>",
        "<text x=\"90\" y=\"90\" text-anchor=\"middle\" dominant-baseline=\"central\">1</text>",
        "</svg>",
    ]
    .join("\n");
    assert_eq!(markup, expected);
}

#[test]
fn geometry_markup_omits_labels() {
    let layout = serialize(&selection(&[9, 10]), &Grid::default(), 60).expect("serialize");
    let markup = render_markup(&layout, MarkupStyle::Geometry);
    assert!(!markup.contains("<text"));
    assert_eq!(markup.matches("<rect").count(), 2);
}

#[test]
fn markup_round_trip_keeps_placement() {
    let layout = serialize(&selection(&[12, 3, 27, 40]), &Grid::default(), 48).expect("serialize");
    for style in [MarkupStyle::Labelled, MarkupStyle::Geometry] {
        let parsed = parse_rects(&render_markup(&layout, style)).expect("parse");
        assert_eq!(parsed, layout.rects);
    }
}

#[test]
fn serialization_is_deterministic() {
    let first = render_markup(
        &serialize(&selection(&[5, 1, 6]), &Grid::default(), 60).expect("serialize"),
        MarkupStyle::Labelled,
    );
    let second = render_markup(
        &serialize(&selection(&[5, 1, 6]), &Grid::default(), 60).expect("serialize"),
        MarkupStyle::Labelled,
    );
    assert_eq!(first, second);
}

#[test]
fn parse_rejects_malformed_rects() {
    let err = parse_rects(r#"<rect id="cell-1" x="0" y="0" width="10"/>"#).expect_err("height");
    assert_eq!(err, LayoutError::InvalidMarkup("rect missing height".to_string()));

    let err = parse_rects(r#"<rect id="unit-1" x="0" y="0" width="10" height="10"/>"#)
        .expect_err("id");
    assert_eq!(err, LayoutError::InvalidMarkup("id: unit-1".to_string()));

    assert!(parse_rects("<rect id=\"cell-1\"").is_err());
}

#[test]
fn serialize_rejects_pixel_overflow_and_stray_cells() {
    let grid = Grid::new(1, 256).expect("grid");
    let err = serialize(&selection(&[255]), &grid, u32::MAX / 100).expect_err("overflow");
    assert_eq!(err, LayoutError::InvalidGrid { rows: 1, cols: 256 });

    let err = serialize(&selection(&[64]), &Grid::default(), 60).expect_err("outside grid");
    assert_eq!(
        err,
        LayoutError::InvalidGridIndex {
            index: 64,
            cell_count: 64
        }
    );
}

#[test]
fn largest_grid_places_last_cell_exactly() {
    let grid = Grid::new(256, 256).expect("grid");
    let last = 256 * 256 - 1;
    let layout = serialize(&selection(&[last]), &grid, 1024).expect("serialize");
    let rect = &layout.rects[0];
    assert_eq!((rect.x, rect.y), (255 * 1024, 255 * 1024));
    assert_eq!(layout.origin(), (255 * 1024, 255 * 1024));
    assert_eq!(layout.layout_width(), 1024);
}
