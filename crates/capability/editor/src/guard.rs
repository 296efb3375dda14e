//! 楼层保存在途标记。

use crate::error::EditorError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 在途保存集合，键为 `tenant:property:floor`。
#[derive(Debug, Clone, Default)]
pub struct SaveGuards {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SaveGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// 占用楼层；已被占用时返回 `SaveInFlight`。
    pub fn acquire(
        &self,
        tenant_id: &str,
        property_id: &str,
        floor_no: u32,
    ) -> Result<SaveGuard, EditorError> {
        let key = format!("{tenant_id}:{property_id}:{floor_no}");
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| EditorError::Storage("lock failed".to_string()))?;
        if !set.insert(key.clone()) {
            return Err(EditorError::SaveInFlight { floor_no });
        }
        Ok(SaveGuard {
            in_flight: self.in_flight.clone(),
            key,
        })
    }
}

/// 离开作用域时释放占用（含错误返回路径）。
#[derive(Debug)]
pub struct SaveGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for SaveGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.lock() {
            set.remove(&self.key);
        }
    }
}
