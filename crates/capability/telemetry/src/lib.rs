//! 追踪初始化、请求 ID 生成与布局编辑指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub drafts_opened: u64,
    pub cell_edits: u64,
    pub layouts_saved: u64,
    pub save_rejected_empty: u64,
    pub save_rejected_in_flight: u64,
    pub save_rejected_collision: u64,
    pub save_latency_ms_total: u64,
    pub save_latency_ms_count: u64,
    pub displays_resolved: u64,
}

/// 布局编辑指标。
pub struct TelemetryMetrics {
    drafts_opened: AtomicU64,
    cell_edits: AtomicU64,
    layouts_saved: AtomicU64,
    save_rejected_empty: AtomicU64,
    save_rejected_in_flight: AtomicU64,
    save_rejected_collision: AtomicU64,
    save_latency_ms_total: AtomicU64,
    save_latency_ms_count: AtomicU64,
    displays_resolved: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            drafts_opened: AtomicU64::new(0),
            cell_edits: AtomicU64::new(0),
            layouts_saved: AtomicU64::new(0),
            save_rejected_empty: AtomicU64::new(0),
            save_rejected_in_flight: AtomicU64::new(0),
            save_rejected_collision: AtomicU64::new(0),
            save_latency_ms_total: AtomicU64::new(0),
            save_latency_ms_count: AtomicU64::new(0),
            displays_resolved: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            drafts_opened: self.drafts_opened.load(Ordering::Relaxed),
            cell_edits: self.cell_edits.load(Ordering::Relaxed),
            layouts_saved: self.layouts_saved.load(Ordering::Relaxed),
            save_rejected_empty: self.save_rejected_empty.load(Ordering::Relaxed),
            save_rejected_in_flight: self.save_rejected_in_flight.load(Ordering::Relaxed),
            save_rejected_collision: self.save_rejected_collision.load(Ordering::Relaxed),
            save_latency_ms_total: self.save_latency_ms_total.load(Ordering::Relaxed),
            save_latency_ms_count: self.save_latency_ms_count.load(Ordering::Relaxed),
            displays_resolved: self.displays_resolved.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，`RUST_LOG` 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录打开编辑草稿次数。
pub fn record_draft_opened() {
    metrics().drafts_opened.fetch_add(1, Ordering::Relaxed);
}

/// 记录选区编辑次数（toggle/add/remove/clear）。
pub fn record_cell_edit() {
    metrics().cell_edits.fetch_add(1, Ordering::Relaxed);
}

/// 记录楼层保存成功次数。
pub fn record_layout_saved() {
    metrics().layouts_saved.fetch_add(1, Ordering::Relaxed);
}

/// 记录空选区保存被拒次数。
pub fn record_save_rejected_empty() {
    metrics().save_rejected_empty.fetch_add(1, Ordering::Relaxed);
}

/// 记录并发保存被拒次数。
pub fn record_save_rejected_in_flight() {
    metrics()
        .save_rejected_in_flight
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录单元名冲突被拒次数。
pub fn record_save_rejected_collision() {
    metrics()
        .save_rejected_collision
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录保存耗时（毫秒，含读取已有楼层与写库）。
pub fn record_save_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .save_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .save_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录展示状态计算次数。
pub fn record_display_resolved() {
    metrics().displays_resolved.fetch_add(1, Ordering::Relaxed);
}
