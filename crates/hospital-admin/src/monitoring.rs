//! 分诊队列监控
//!
//! 以Prometheus指标暴露队列长度、各级别人数、平均等待时间和床位情况。

use anyhow::Result;
use hospital_triage::{EmergencyOverview, TriagePriority};
use prometheus::{IntCounter, IntGauge, IntGaugeVec, Opts, Registry};

/// 分诊指标收集器
#[derive(Debug, Clone)]
pub struct TriageMetrics {
    /// Prometheus指标注册表
    registry: Registry,
    /// 队列长度
    queue_length: IntGauge,
    /// 各级别人数
    patients_by_priority: IntGaugeVec,
    /// 平均等待时间
    average_wait_minutes: IntGauge,
    /// 超过目标响应时间的人数
    overdue_patients: IntGauge,
    /// 空闲急诊床位
    available_beds: IntGauge,
    /// 手动调整级别次数
    priority_overrides_total: IntCounter,
}

impl TriageMetrics {
    /// 创建并注册所有指标
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let queue_length = IntGauge::with_opts(Opts::new(
            "triage_queue_length",
            "Number of patients in the emergency triage queue",
        ))?;

        let patients_by_priority = IntGaugeVec::new(
            Opts::new(
                "triage_patients_by_priority",
                "Number of queued patients per triage priority",
            ),
            &["priority"],
        )?;

        let average_wait_minutes = IntGauge::with_opts(Opts::new(
            "triage_average_wait_minutes",
            "Average wait time of queued patients in minutes",
        ))?;

        let overdue_patients = IntGauge::with_opts(Opts::new(
            "triage_overdue_patients",
            "Queued patients waiting longer than their target response time",
        ))?;

        let available_beds = IntGauge::with_opts(Opts::new(
            "emergency_available_beds",
            "Available beds in the emergency ward",
        ))?;

        let priority_overrides_total = IntCounter::with_opts(Opts::new(
            "triage_priority_overrides_total",
            "Total number of manual triage priority changes",
        ))?;

        // 注册所有指标
        registry.register(Box::new(queue_length.clone()))?;
        registry.register(Box::new(patients_by_priority.clone()))?;
        registry.register(Box::new(average_wait_minutes.clone()))?;
        registry.register(Box::new(overdue_patients.clone()))?;
        registry.register(Box::new(available_beds.clone()))?;
        registry.register(Box::new(priority_overrides_total.clone()))?;

        Ok(Self {
            registry,
            queue_length,
            patients_by_priority,
            average_wait_minutes,
            overdue_patients,
            available_beds,
            priority_overrides_total,
        })
    }

    /// 根据急诊概览更新指标
    pub fn observe(&self, overview: &EmergencyOverview) {
        let stats = &overview.stats;
        self.queue_length.set(stats.queue_length as i64);
        self.average_wait_minutes.set(i64::from(stats.average_wait_minutes));
        self.overdue_patients.set(stats.overdue_patients as i64);
        self.available_beds.set(overview.available_beds as i64);

        for priority in TriagePriority::ALL {
            let count = stats.by_priority.get(&priority).copied().unwrap_or(0);
            self.patients_by_priority
                .with_label_values(&[priority.as_str()])
                .set(count as i64);
        }
    }

    /// 记录一次手动调整
    pub fn record_override(&self) {
        self.priority_overrides_total.inc();
    }

    /// 获取Prometheus文本格式指标
    pub fn render(&self) -> Result<String> {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospital_triage::{TriageQueue, TriageStats};

    #[test]
    fn test_observe_and_render() {
        let metrics = TriageMetrics::new().unwrap();
        let overview = EmergencyOverview {
            stats: TriageStats::from_queue(&TriageQueue::default()),
            available_beds: 3,
            occupied_beds: 1,
        };

        metrics.observe(&overview);
        metrics.record_override();
        metrics.record_override();

        let text = metrics.render().unwrap();
        assert!(text.contains("triage_queue_length 0"));
        assert!(text.contains("emergency_available_beds 3"));
        assert!(text.contains("triage_priority_overrides_total 2"));
        assert!(text.contains("triage_patients_by_priority{priority=\"Critical\"} 0"));
    }
}
