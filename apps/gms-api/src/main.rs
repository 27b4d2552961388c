//! GMS HTTP API：心跳接入、设备状态读取、批量命令下发与请求追踪 ID。

mod handlers;
mod routes;
mod utils;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use gms_config::AppConfig;
use gms_control::{BulkDispatcher, HttpCommandTransport};
use gms_status::{FusionThresholds, StatusEvaluator};
use gms_storage::{HeartbeatStore, JsonFileHeartbeatStore};
use gms_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// 各 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HeartbeatStore>,
    pub evaluator: StatusEvaluator,
    pub dispatcher: Arc<BulkDispatcher>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 权威心跳存储：JSON 文件，损坏时告警后按空库启动
    let store: Arc<dyn HeartbeatStore> =
        Arc::new(JsonFileHeartbeatStore::open(&config.state_path).await?);
    // 订阅存储快照：设备集合变更时打一条结构化日志，防抖合并密集写入
    let mut snapshots = gms_storage::debounced(
        store.subscribe(),
        Duration::from_millis(config.snapshot_debounce_ms),
    );
    tokio::spawn(async move {
        while let Some(snapshot) = snapshots.recv().await {
            tracing::info!(target: "gms.storage", devices = snapshot.len(), "device_set_changed");
        }
    });
    // 状态评估器：心跳阈值 + 探测端口/超时
    let evaluator = StatusEvaluator::new(
        FusionThresholds {
            stale_ms: config.stale_threshold_ms,
            offline_ms: config.offline_threshold_ms,
        },
        config.probe_port,
        Duration::from_millis(config.probe_timeout_ms),
    );
    // 设备命令传输与批量下发器
    let transport = Arc::new(HttpCommandTransport::new(
        config.command_port,
        Duration::from_millis(config.command_timeout_ms),
    )?);
    let dispatcher = Arc::new(BulkDispatcher::new(evaluator.clone(), transport));
    let state = AppState {
        store,
        evaluator,
        dispatcher,
    };

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(target: "gms.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
