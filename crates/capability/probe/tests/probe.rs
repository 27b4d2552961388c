use gms_probe::{ProbeError, probe};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

#[tokio::test]
async fn connected_listener_is_reachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let outcome = probe("127.0.0.1", port, Duration::from_millis(1000))
        .await
        .expect("probe");
    assert!(outcome.reachable);
    assert!(outcome.rtt_ms < 1000);
}

#[tokio::test]
async fn closed_port_reports_unreachable_not_error() {
    // 先占住一个端口再释放，拿到一个大概率无人监听的端口。
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let outcome = probe("127.0.0.1", port, Duration::from_millis(1000))
        .await
        .expect("refused is a determined outcome");
    assert!(!outcome.reachable);
}

#[tokio::test]
async fn unresolvable_host_is_an_error_not_unreachable() {
    let result = probe("host.invalid", 7700, Duration::from_millis(1000)).await;
    match result {
        Err(ProbeError::Network(_) | ProbeError::InvalidAddress(_) | ProbeError::Timeout(_)) => {}
        Ok(outcome) => panic!("expected error, got {outcome:?}"),
    }
}

#[tokio::test]
async fn probe_resolves_within_time_budget() {
    // 黑洞地址：要么快速网络错误，要么在预算处超时，绝不悬挂。
    let started = Instant::now();
    let result = probe("10.255.255.1", 7700, Duration::from_millis(200)).await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_millis(1500));
}
