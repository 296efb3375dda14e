//! 计数器快照。
//!
//! - GET /metrics

use api_contract::MetricsSnapshotDto;
use axum::{extract::State, http::HeaderMap, response::Response};
use domain::permissions;
use pms_telemetry::metrics;

use crate::{
    AppState,
    middleware::{require_permission, require_tenant_context},
    utils::response::ok,
};

pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_tenant_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::SYSTEM_METRICS_READ) {
        return response;
    }

    let snapshot = metrics().snapshot();
    ok(MetricsSnapshotDto {
        drafts_opened: snapshot.drafts_opened,
        cell_edits: snapshot.cell_edits,
        layouts_saved: snapshot.layouts_saved,
        save_rejected_empty: snapshot.save_rejected_empty,
        save_rejected_in_flight: snapshot.save_rejected_in_flight,
        save_rejected_collision: snapshot.save_rejected_collision,
        save_latency_ms_total: snapshot.save_latency_ms_total,
        save_latency_ms_count: snapshot.save_latency_ms_count,
        displays_resolved: snapshot.displays_resolved,
    })
}
