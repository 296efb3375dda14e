//! HTTP 响应辅助函数
//!
//! 提供统一的错误响应构造函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error, not_found_error,
//!   internal_auth_error, storage_error, editor_error
//! - 成功响应：ok
//!
//! HTTP 状态码与错误码一一对应，所有错误返回统一的 ApiResponse 格式。

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pms_auth::AuthError;
use pms_editor::EditorError;
use pms_layout::LayoutError;
use pms_storage::StorageError;
use serde::Serialize;

/// 200 + 成功响应体
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(code, message.into()))).into_response()
}

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    error_response(status, "AUTH.UNAUTHORIZED", "unauthorized")
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    error_response(StatusCode::FORBIDDEN, "AUTH.FORBIDDEN", "forbidden")
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID.REQUEST", message)
}

/// 资源未找到错误响应
pub fn not_found_error(resource: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "RESOURCE.NOT_FOUND",
        format!("{resource} not found"),
    )
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR", err.to_string())
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    tracing::error!(target: "pms.api", error = %err, "storage_error");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR", err.to_string())
}

/// 布局核心错误响应
pub fn layout_error(err: LayoutError) -> Response {
    let message = err.to_string();
    match err {
        LayoutError::EmptySelection => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "LAYOUT.EMPTY_SELECTION",
            message,
        ),
        LayoutError::DuplicateUnitName(_) => {
            error_response(StatusCode::CONFLICT, "LAYOUT.NAME_COLLISION", message)
        }
        LayoutError::UnknownValue { .. } => bad_request_error(message),
        LayoutError::InvalidGrid { .. }
        | LayoutError::InvalidGridIndex { .. }
        | LayoutError::DuplicateCell(_)
        | LayoutError::InvalidMarkup(_) => {
            error_response(StatusCode::BAD_REQUEST, "LAYOUT.INVALID_CELL", message)
        }
    }
}

/// 编辑服务错误响应
pub fn editor_error(err: EditorError) -> Response {
    match err {
        EditorError::Layout(err) => layout_error(err),
        EditorError::NotFound(resource) => not_found_error(resource),
        EditorError::SaveInFlight { floor_no } => error_response(
            StatusCode::CONFLICT,
            "LAYOUT.SAVE_IN_FLIGHT",
            format!("save already in flight for floor {floor_no}"),
        ),
        EditorError::InvalidPayload(message) => bad_request_error(message),
        EditorError::Storage(message) => {
            tracing::error!(target: "pms.api", error = %message, "storage_error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_errors_map_to_stable_statuses() {
        let cases = [
            (LayoutError::EmptySelection, StatusCode::UNPROCESSABLE_ENTITY),
            (
                LayoutError::DuplicateUnitName("A1".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                LayoutError::InvalidGridIndex {
                    index: 64,
                    cell_count: 64,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                LayoutError::UnknownValue {
                    field: "layout_type",
                    value: "round".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(layout_error(err).status(), status);
        }
    }

    #[test]
    fn editor_errors_map_to_stable_statuses() {
        assert_eq!(
            editor_error(EditorError::SaveInFlight { floor_no: 2 }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            editor_error(EditorError::NotFound("draft")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            editor_error(EditorError::Storage("down".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
