mod common;

use common::{Fixture, ctx};
use domain::UnitStatus;
use pms_editor::{EditorError, SaveOptions, UnitPatch};
use pms_layout::{LayoutError, LayoutType, NamePolicy, UnitDefaults, parse_rects};

#[tokio::test]
async fn open_without_saved_floor_starts_empty() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    let session = editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    assert!(session.layout.selection.is_empty());
    assert_eq!(session.layout.grid.cols(), 8);
    assert_eq!(session.layout.layout_type, LayoutType::Rectangular);
}

#[tokio::test]
async fn open_unknown_property_is_not_found() {
    let fixture = Fixture::new();
    let err = fixture
        .editor()
        .open_draft(&ctx(), "property-404", 0)
        .await
        .expect_err("missing");
    assert!(matches!(err, EditorError::NotFound("property")));
}

#[tokio::test]
async fn edits_keep_selection_order() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    for cell in [17, 0, 9] {
        editor
            .toggle_cell(&ctx(), "property-1", 0, cell)
            .await
            .expect("toggle");
    }
    editor.add_cell(&ctx(), "property-1", 0, 0).await.expect("add");
    let session = editor
        .remove_cell(&ctx(), "property-1", 0, 5)
        .await
        .expect("remove");
    assert_eq!(session.layout.selection.cells(), &[17, 0, 9]);

    let session = editor
        .toggle_cell(&ctx(), "property-1", 0, 0)
        .await
        .expect("toggle");
    assert_eq!(session.layout.selection.cells(), &[17, 9]);

    let reloaded = editor.get_draft(&ctx(), "property-1", 0).await.expect("get");
    assert_eq!(reloaded.layout.selection.cells(), &[17, 9]);
}

#[tokio::test]
async fn out_of_grid_cell_is_rejected_without_mutation() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    editor.add_cell(&ctx(), "property-1", 0, 3).await.expect("add");
    let err = editor
        .toggle_cell(&ctx(), "property-1", 0, 64)
        .await
        .expect_err("outside");
    assert!(matches!(
        err,
        EditorError::Layout(LayoutError::InvalidGridIndex {
            index: 64,
            cell_count: 64
        })
    ));
    let session = editor.get_draft(&ctx(), "property-1", 0).await.expect("get");
    assert_eq!(session.layout.selection.cells(), &[3]);
}

#[tokio::test]
async fn edits_without_open_draft_are_not_found() {
    let fixture = Fixture::new();
    let err = fixture
        .editor()
        .toggle_cell(&ctx(), "property-1", 0, 1)
        .await
        .expect_err("no draft");
    assert!(matches!(err, EditorError::NotFound("draft")));
}

#[tokio::test]
async fn save_persists_units_and_drops_draft() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 2).await.expect("open");
    for cell in [0, 9, 17] {
        editor.add_cell(&ctx(), "property-1", 2, cell).await.expect("add");
    }
    let saved = editor
        .save_draft(&ctx(), "property-1", 2, SaveOptions::default())
        .await
        .expect("save");
    assert_eq!(saved.units_total, 3);
    let names: Vec<&str> = saved.units.iter().map(|unit| unit.unit_name.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2", "A3"]);
    let ids: Vec<u32> = saved.units.iter().map(|unit| unit.svg_id).collect();
    assert_eq!(ids, vec![0, 9, 17]);
    assert!(saved.units.iter().all(|unit| unit.floor_number == 2));
    assert_eq!(
        saved.units[1].svg_geom,
        r#"<rect id="cell-9" x="10" y="10" width="10" height="10"/>"#
    );
    let rects = parse_rects(&saved.layout_data).expect("markup");
    assert_eq!(rects.len(), 3);

    let err = editor
        .get_draft(&ctx(), "property-1", 2)
        .await
        .expect_err("draft removed");
    assert!(matches!(err, EditorError::NotFound("draft")));
}

#[tokio::test]
async fn empty_save_respects_policy() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    let err = editor
        .save_draft(&ctx(), "property-1", 0, SaveOptions::default())
        .await
        .expect_err("empty");
    assert!(matches!(err, EditorError::Layout(LayoutError::EmptySelection)));
    assert!(editor.find_floor(&ctx(), "property-1", 0).await.is_err());

    let options = SaveOptions {
        require_units: false,
        ..SaveOptions::default()
    };
    let saved = editor
        .save_draft(&ctx(), "property-1", 0, options)
        .await
        .expect("save empty");
    assert_eq!(saved.units_total, 0);
    assert!(saved.units.is_empty());
}

#[tokio::test]
async fn reopen_hydrates_in_saved_order() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 1).await.expect("open");
    for cell in [5, 2] {
        editor.add_cell(&ctx(), "property-1", 1, cell).await.expect("add");
    }
    editor
        .save_draft(&ctx(), "property-1", 1, SaveOptions::default())
        .await
        .expect("save");
    let session = editor.open_draft(&ctx(), "property-1", 1).await.expect("reopen");
    assert_eq!(session.layout.selection.cells(), &[5, 2]);
}

#[tokio::test]
async fn resave_keeps_edited_unit_attributes() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    let options = SaveOptions {
        defaults: UnitDefaults {
            rent_amount: 400.0,
            ..UnitDefaults::default()
        },
        ..SaveOptions::default()
    };
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    for cell in [1, 2] {
        editor.add_cell(&ctx(), "property-1", 0, cell).await.expect("add");
    }
    editor
        .save_draft(&ctx(), "property-1", 0, options.clone())
        .await
        .expect("save");
    editor
        .update_unit(
            &ctx(),
            "property-1",
            0,
            2,
            UnitPatch {
                rent_amount: Some(950.0),
                status: Some(UnitStatus::Reserved),
                ..UnitPatch::default()
            },
        )
        .await
        .expect("update");

    editor.open_draft(&ctx(), "property-1", 0).await.expect("reopen");
    editor.add_cell(&ctx(), "property-1", 0, 3).await.expect("add");
    let saved = editor
        .save_draft(&ctx(), "property-1", 0, options)
        .await
        .expect("resave");
    assert_eq!(saved.units[1].rent_amount, 950.0);
    assert_eq!(saved.units[1].status, UnitStatus::Reserved);
    assert_eq!(saved.units[2].rent_amount, 400.0);
    assert_eq!(saved.units[2].unit_name, "A3");
}

#[tokio::test]
async fn preserved_names_can_collide() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    for cell in [1, 2] {
        editor.add_cell(&ctx(), "property-1", 0, cell).await.expect("add");
    }
    editor
        .save_draft(&ctx(), "property-1", 0, SaveOptions::default())
        .await
        .expect("save");

    // 删除 A1 后新增格子，新单元生成名 A2 与保留的 A2 冲突
    editor.open_draft(&ctx(), "property-1", 0).await.expect("reopen");
    editor.remove_cell(&ctx(), "property-1", 0, 1).await.expect("remove");
    editor.add_cell(&ctx(), "property-1", 0, 7).await.expect("add");
    let err = editor
        .save_draft(&ctx(), "property-1", 0, SaveOptions::default())
        .await
        .expect_err("collision");
    assert!(matches!(
        err,
        EditorError::Layout(LayoutError::DuplicateUnitName(ref name)) if name == "A2"
    ));
    let stored = editor.find_floor(&ctx(), "property-1", 0).await.expect("floor");
    assert_eq!(stored.units_total, 2);

    let renumber = SaveOptions {
        name_policy: NamePolicy::Renumber,
        ..SaveOptions::default()
    };
    let saved = editor
        .save_draft(&ctx(), "property-1", 0, renumber)
        .await
        .expect("renumber");
    let names: Vec<&str> = saved.units.iter().map(|unit| unit.unit_name.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2"]);
}

#[tokio::test]
async fn unit_rename_must_stay_unique() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    for cell in [1, 2] {
        editor.add_cell(&ctx(), "property-1", 0, cell).await.expect("add");
    }
    editor
        .save_draft(&ctx(), "property-1", 0, SaveOptions::default())
        .await
        .expect("save");
    let err = editor
        .update_unit(
            &ctx(),
            "property-1",
            0,
            2,
            UnitPatch {
                unit_name: Some("A1".to_string()),
                ..UnitPatch::default()
            },
        )
        .await
        .expect_err("duplicate");
    assert!(matches!(
        err,
        EditorError::Layout(LayoutError::DuplicateUnitName(_))
    ));
    let err = editor
        .update_unit(&ctx(), "property-1", 0, 42, UnitPatch::default())
        .await
        .expect_err("missing unit");
    assert!(matches!(err, EditorError::NotFound("unit")));
}

#[tokio::test]
async fn layout_type_and_discard() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    let session = editor
        .set_layout_type(&ctx(), "property-1", 0, LayoutType::LShaped, None)
        .await
        .expect("type");
    assert_eq!(session.layout.layout_type, LayoutType::LShaped);
    assert!(editor.discard_draft(&ctx(), "property-1", 0).await.expect("discard"));
    assert!(!editor.discard_draft(&ctx(), "property-1", 0).await.expect("discard"));
}

#[tokio::test]
async fn preview_is_trimmed_to_selection() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    editor.open_draft(&ctx(), "property-1", 0).await.expect("open");
    for cell in [10, 19] {
        editor.add_cell(&ctx(), "property-1", 0, cell).await.expect("add");
    }
    let preview = editor.preview(&ctx(), "property-1", 0).await.expect("preview");
    assert_eq!(preview.origin(), (20, 10));
    assert_eq!(preview.layout_width(), 20);
    assert_eq!(preview.layout_height(), 20);
}

#[tokio::test]
async fn purge_property_removes_floors_and_drafts() {
    let fixture = Fixture::new();
    let editor = fixture.editor();
    for floor_no in [0, 1] {
        editor.open_draft(&ctx(), "property-1", floor_no).await.expect("open");
        editor
            .toggle_cell(&ctx(), "property-1", floor_no, 3)
            .await
            .expect("toggle");
        editor
            .save_draft(&ctx(), "property-1", floor_no, SaveOptions::default())
            .await
            .expect("save");
    }
    editor.open_draft(&ctx(), "property-1", 4).await.expect("open");

    let removed = editor
        .purge_property(&ctx(), "property-1")
        .await
        .expect("purge");
    assert_eq!(removed, 2);
    assert!(editor.list_floors(&ctx(), "property-1").await.expect("list").is_empty());
    let err = editor
        .get_draft(&ctx(), "property-1", 4)
        .await
        .expect_err("draft gone");
    assert!(matches!(err, EditorError::NotFound("draft")));
}
