#![allow(dead_code)]

use domain::TenantContext;
use pms_editor::{EditorConfig, FloorDisplayService, LayoutEditor};
use pms_storage::{
    DraftStore, FloorLayoutStore, InMemoryDraftStore, InMemoryFloorLayoutStore,
    InMemoryOccupancyStore, InMemoryPropertyStore, OccupancyStore, PropertyStore,
};
use std::sync::Arc;

pub struct Fixture {
    pub properties: Arc<dyn PropertyStore>,
    pub floors: Arc<dyn FloorLayoutStore>,
    pub drafts: Arc<dyn DraftStore>,
    pub occupancies: Arc<dyn OccupancyStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_floors(Arc::new(InMemoryFloorLayoutStore::new()))
    }

    pub fn with_floors(floors: Arc<dyn FloorLayoutStore>) -> Self {
        Self {
            properties: Arc::new(InMemoryPropertyStore::with_default_property()),
            floors,
            drafts: Arc::new(InMemoryDraftStore::new()),
            occupancies: Arc::new(InMemoryOccupancyStore::new()),
        }
    }

    pub fn editor(&self) -> LayoutEditor {
        LayoutEditor::new(
            self.properties.clone(),
            self.floors.clone(),
            self.drafts.clone(),
            EditorConfig { cell_size_px: 10 },
        )
    }

    pub fn display(&self) -> FloorDisplayService {
        FloorDisplayService::new(
            self.properties.clone(),
            self.floors.clone(),
            self.occupancies.clone(),
        )
    }
}

pub fn ctx() -> TenantContext {
    TenantContext::new("tenant-1", "user-1", vec![], vec![], None)
}
