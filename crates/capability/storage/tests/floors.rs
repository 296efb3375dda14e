use domain::{PaymentFrequency, TenantContext, UnitRecord, UnitStatus, Utilities};
use pms_storage::{FloorLayoutRecord, FloorLayoutStore, InMemoryFloorLayoutStore};

fn ctx() -> TenantContext {
    TenantContext::new("tenant-1", "user-1", vec![], vec![], None)
}

fn unit(svg_id: u32, name: &str, floor: u32) -> UnitRecord {
    UnitRecord {
        svg_id,
        svg_geom: String::new(),
        unit_name: name.to_string(),
        floor_number: floor,
        area_sqm: 20.0,
        bedrooms: 1,
        status: UnitStatus::Vacant,
        rent_amount: 500.0,
        payment_frequency: PaymentFrequency::Monthly,
        utilities: Utilities::default(),
    }
}

fn floor(floor_no: u32, units: Vec<UnitRecord>) -> FloorLayoutRecord {
    FloorLayoutRecord {
        tenant_id: "tenant-1".to_string(),
        property_id: "property-1".to_string(),
        floor_no,
        units_total: units.len() as u32,
        layout_type: "rectangular".to_string(),
        creation_method: "grid".to_string(),
        layout_data: "<svg/>".to_string(),
        units,
        updated_at_ms: 1,
    }
}

#[tokio::test]
async fn save_replaces_whole_floor() {
    let store = InMemoryFloorLayoutStore::new();
    store
        .save_floor(&ctx(), floor(0, vec![unit(5, "A1", 0), unit(2, "A2", 0)]))
        .await
        .expect("save");
    store
        .save_floor(&ctx(), floor(0, vec![unit(9, "A1", 0)]))
        .await
        .expect("save");
    let saved = store
        .find_floor(&ctx(), "property-1", 0)
        .await
        .expect("find")
        .expect("floor");
    assert_eq!(saved.units_total, 1);
    assert_eq!(saved.units.len(), 1);
    assert_eq!(saved.units[0].svg_id, 9);
}

#[tokio::test]
async fn list_orders_by_floor_number() {
    let store = InMemoryFloorLayoutStore::new();
    for floor_no in [2, 0, 1] {
        store
            .save_floor(&ctx(), floor(floor_no, vec![unit(0, "A1", floor_no)]))
            .await
            .expect("save");
    }
    let floors = store.list_floors(&ctx(), "property-1").await.expect("list");
    let numbers: Vec<u32> = floors.iter().map(|floor| floor.floor_no).collect();
    assert_eq!(numbers, vec![0, 1, 2]);

    let other = TenantContext::new("tenant-2", "user-2", vec![], vec![], None);
    assert!(store.list_floors(&other, "property-1").await.expect("list").is_empty());
}

#[tokio::test]
async fn update_unit_touches_only_matching_svg_id() {
    let store = InMemoryFloorLayoutStore::new();
    store
        .save_floor(&ctx(), floor(0, vec![unit(5, "A1", 0), unit(2, "A2", 0)]))
        .await
        .expect("save");
    let mut changed = unit(2, "Penthouse", 0);
    changed.status = UnitStatus::Maintenance;
    assert!(store
        .update_unit(&ctx(), "property-1", 0, changed)
        .await
        .expect("update"));
    assert!(!store
        .update_unit(&ctx(), "property-1", 0, unit(7, "X", 0))
        .await
        .expect("update"));

    let saved = store
        .find_floor(&ctx(), "property-1", 0)
        .await
        .expect("find")
        .expect("floor");
    assert_eq!(saved.units[0].unit_name, "A1");
    assert_eq!(saved.units[1].unit_name, "Penthouse");
    assert_eq!(saved.units[1].status, UnitStatus::Maintenance);
}

#[tokio::test]
async fn delete_floor_reports_presence() {
    let store = InMemoryFloorLayoutStore::new();
    store
        .save_floor(&ctx(), floor(3, vec![]))
        .await
        .expect("save");
    assert!(store.delete_floor(&ctx(), "property-1", 3).await.expect("delete"));
    assert!(!store.delete_floor(&ctx(), "property-1", 3).await.expect("delete"));
}

#[tokio::test]
async fn save_rejects_foreign_tenant_record() {
    let store = InMemoryFloorLayoutStore::new();
    let mut record = floor(0, vec![]);
    record.tenant_id = "tenant-2".to_string();
    let err = store.save_floor(&ctx(), record).await.expect_err("tenant");
    assert_eq!(err.to_string(), "tenant mismatch");
}
