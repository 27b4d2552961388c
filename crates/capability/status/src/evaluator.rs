//! 状态评估器：给记录配上现场探测，套用融合策略。

use crate::fusion::{FusionThresholds, fuse};
use domain::{DeclaredStatus, EffectiveStatus};
use gms_probe::{ProbeOutcome, probe};
use gms_storage::DeviceRecord;
use gms_telemetry::{
    record_probe_attempted, record_probe_failure, record_probe_reachable, record_probe_refused,
};
use std::time::Duration;
use tracing::debug;

/// 单台设备的状态判定结果。
#[derive(Debug, Clone)]
pub struct DeviceStatus {
    pub device_id: String,
    pub effective: EffectiveStatus,
    pub rtt_ms: Option<u64>,
}

/// 状态评估器。
///
/// 自身无状态、可廉价 Clone；探测结果从不跨调用复用，
/// 调用方若要缓存探测证据，走 [`StatusEvaluator::evaluate_with_probe`]
/// 自持一份 map。
#[derive(Debug, Clone)]
pub struct StatusEvaluator {
    thresholds: FusionThresholds,
    probe_port: u16,
    probe_timeout: Duration,
}

impl StatusEvaluator {
    pub fn new(thresholds: FusionThresholds, probe_port: u16, probe_timeout: Duration) -> Self {
        Self {
            thresholds,
            probe_port,
            probe_timeout,
        }
    }

    /// 纯判定：探测证据由调用方提供（或不提供）。
    pub fn evaluate_with_probe(
        &self,
        record: &DeviceRecord,
        probe: Option<&ProbeOutcome>,
        now_ms: i64,
    ) -> EffectiveStatus {
        let freshness = self
            .thresholds
            .classify(record.last_heartbeat_at_ms, now_ms);
        fuse(record.declared_status, freshness, probe)
    }

    /// 现场探测一台设备并判定。
    pub async fn evaluate(&self, record: &DeviceRecord, now_ms: i64) -> DeviceStatus {
        let outcome = self.probe_record(record).await;
        DeviceStatus {
            device_id: record.device_id.clone(),
            effective: self.evaluate_with_probe(record, outcome.as_ref(), now_ms),
            rtt_ms: outcome.map(|o| o.rtt_ms),
        }
    }

    /// 并发判定一组设备，结果保持输入顺序。
    ///
    /// 每台设备一个探测任务，互不共享状态；全部任务收尾后才返回。
    pub async fn evaluate_all(&self, records: &[DeviceRecord], now_ms: i64) -> Vec<DeviceStatus> {
        let mut handles = Vec::with_capacity(records.len());
        for record in records {
            let evaluator = self.clone();
            let record = record.clone();
            handles.push(tokio::spawn(
                async move { evaluator.evaluate(&record, now_ms).await },
            ));
        }
        let mut statuses = Vec::with_capacity(handles.len());
        for (record, handle) in records.iter().zip(handles) {
            match handle.await {
                Ok(status) => statuses.push(status),
                // 任务夭折也不丢结果：退回无探测证据的纯判定
                Err(_) => statuses.push(DeviceStatus {
                    device_id: record.device_id.clone(),
                    effective: self.evaluate_with_probe(record, None, now_ms),
                    rtt_ms: None,
                }),
            }
        }
        statuses
    }

    async fn probe_record(&self, record: &DeviceRecord) -> Option<ProbeOutcome> {
        // 维护态由规则 1 定案，无须发探测
        if record.declared_status == DeclaredStatus::Maintenance {
            return None;
        }
        let ip = record.ip.as_deref()?;
        record_probe_attempted();
        match probe(ip, self.probe_port, self.probe_timeout).await {
            Ok(outcome) => {
                if outcome.reachable {
                    record_probe_reachable();
                } else {
                    record_probe_refused();
                }
                Some(outcome)
            }
            Err(err) => {
                // 探测失败只是「无证据」，不等于不可达
                debug!(
                    target: "gms.status",
                    device_id = %record.device_id,
                    ip = %ip,
                    error = %err,
                    "probe inconclusive"
                );
                record_probe_failure();
                None
            }
        }
    }
}
