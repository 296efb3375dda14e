//! 输入验证辅助函数
//!
//! - normalize_required：验证必填字段，去除空格并检查非空
//! - normalize_optional：验证可选字段，如果提供则去除空格并检查非空
//! - parse_field：解析枚举字符串（未知值拒绝）
//! - ensure_non_negative：校验金额、面积等非负
//!
//! 失败统一返回 bad_request_error 响应。

use crate::utils::response::bad_request_error;
use axum::response::Response;
use std::fmt::Display;
use std::str::FromStr;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    value
        .map(|value| normalize_required(value, field))
        .transpose()
}

/// 解析枚举字符串
pub fn parse_field<T>(value: &str) -> Result<T, Response>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map_err(|err| bad_request_error(err.to_string()))
}

/// 解析可选枚举字符串
pub fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, Response>
where
    T: FromStr,
    T::Err: Display,
{
    value.map(parse_field).transpose()
}

/// 校验数值非负且有限
pub fn ensure_non_negative(value: Option<f64>, field: &str) -> Result<(), Response> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(bad_request_error(format!("{field} must be a non-negative number")))
        }
        _ => Ok(()),
    }
}
