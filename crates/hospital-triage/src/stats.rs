//! 分诊队列统计

use hospital_core::TriagePriority;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::queue::TriageQueue;

/// 分诊队列统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageStats {
    pub queue_length: usize,
    pub critical_patients: usize,
    /// 平均等待时间（分钟，四舍五入），空队列为0
    pub average_wait_minutes: u32,
    pub overdue_patients: usize,
    pub by_priority: HashMap<TriagePriority, usize>,
}

impl TriageStats {
    pub fn from_queue(queue: &TriageQueue) -> Self {
        let mut by_priority: HashMap<TriagePriority, usize> =
            TriagePriority::ALL.iter().map(|&p| (p, 0)).collect();
        let mut total_wait: u64 = 0;
        let mut overdue_patients = 0;

        for entry in queue {
            *by_priority.entry(entry.priority).or_insert(0) += 1;
            total_wait += u64::from(entry.wait_time_minutes);
            if entry.is_overdue() {
                overdue_patients += 1;
            }
        }

        let average_wait_minutes = if queue.is_empty() {
            0
        } else {
            (total_wait as f64 / queue.len() as f64).round() as u32
        };

        Self {
            queue_length: queue.len(),
            critical_patients: by_priority[&TriagePriority::Critical],
            average_wait_minutes,
            overdue_patients,
            by_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::TriagePatient;
    use chrono::{DateTime, Utc};

    fn entry(id: &str, priority: TriagePriority, wait: u32) -> TriagePatient {
        TriagePatient {
            id: id.to_string(),
            name: id.to_string(),
            arrival_time: DateTime::<Utc>::UNIX_EPOCH,
            priority,
            wait_time_minutes: wait,
        }
    }

    #[test]
    fn test_empty_queue_stats() {
        let stats = TriageStats::from_queue(&TriageQueue::default());
        assert_eq!(stats.queue_length, 0);
        assert_eq!(stats.critical_patients, 0);
        assert_eq!(stats.average_wait_minutes, 0);
        assert_eq!(stats.by_priority.len(), 4);
    }

    #[test]
    fn test_stats_counts_and_rounded_average() {
        let queue = TriageQueue::from_entries(vec![
            entry("P1", TriagePriority::Critical, 10),
            entry("P2", TriagePriority::Critical, 0),
            entry("P3", TriagePriority::Low, 25),
            entry("P4", TriagePriority::Medium, 90),
        ]);

        let stats = TriageStats::from_queue(&queue);
        assert_eq!(stats.queue_length, 4);
        assert_eq!(stats.critical_patients, 2);
        // (10 + 0 + 25 + 90) / 4 = 31.25
        assert_eq!(stats.average_wait_minutes, 31);
        // P1 过了0分钟目标，P4 过了60分钟目标
        assert_eq!(stats.overdue_patients, 2);
        assert_eq!(stats.by_priority[&TriagePriority::High], 0);
        assert_eq!(stats.by_priority[&TriagePriority::Low], 1);
    }
}
