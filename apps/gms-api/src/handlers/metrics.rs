//! 指标快照 handler
//!
//! - GET /metrics

use api_contract::{MetricsResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gms_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(MetricsResponse::of(MetricsSnapshotDto {
            heartbeats_received: snapshot.heartbeats_received,
            heartbeats_skipped: snapshot.heartbeats_skipped,
            probes_attempted: snapshot.probes_attempted,
            probes_reachable: snapshot.probes_reachable,
            probes_refused: snapshot.probes_refused,
            probe_failures: snapshot.probe_failures,
            commands_issued: snapshot.commands_issued,
            command_send_success: snapshot.command_send_success,
            command_send_failure: snapshot.command_send_failure,
            dispatch_no_eligible: snapshot.dispatch_no_eligible,
            dispatch_latency_ms_total: snapshot.dispatch_latency_ms_total,
            dispatch_latency_ms_count: snapshot.dispatch_latency_ms_count,
        })),
    )
        .into_response()
}
