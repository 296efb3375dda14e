use pms_layout::LayoutError;
use pms_storage::StorageError;

/// 编辑服务错误。
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("save already in flight for floor {floor_no}")]
    SaveInFlight { floor_no: u32 },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<StorageError> for EditorError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
