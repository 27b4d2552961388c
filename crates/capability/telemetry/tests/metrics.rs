use gms_telemetry::{
    metrics, record_dispatch_latency_ms, record_heartbeat_received, record_probe_attempted,
};

// 指标是进程级全局量，断言只看增量，不假设绝对值。
#[test]
fn counters_accumulate_into_snapshot() {
    let before = metrics().snapshot();
    record_heartbeat_received();
    record_heartbeat_received();
    record_probe_attempted();
    record_dispatch_latency_ms(25);
    let after = metrics().snapshot();

    assert_eq!(after.heartbeats_received - before.heartbeats_received, 2);
    assert_eq!(after.probes_attempted - before.probes_attempted, 1);
    assert_eq!(
        after.dispatch_latency_ms_total - before.dispatch_latency_ms_total,
        25
    );
    assert_eq!(
        after.dispatch_latency_ms_count - before.dispatch_latency_ms_count,
        1
    );
}
