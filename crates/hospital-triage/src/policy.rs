//! 分诊分配策略
//!
//! 队列构建时为每位患者确定到达时间、分诊级别和等待时长。
//! 策略以参数形式注入，便于测试得到确定的结果。

use chrono::{DateTime, Duration, Utc};
use hospital_core::utils::minutes_between;
use hospital_core::{Patient, TriagePriority};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 模拟策略中相邻患者的到达间隔（分钟）
pub const SIMULATED_ARRIVAL_INTERVAL_MINUTES: u32 = 30;

/// 单个患者的分诊分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageAssignment {
    pub priority: TriagePriority,
    pub arrival_time: DateTime<Utc>,
    pub wait_time_minutes: u32,
}

/// 分诊分配策略
pub trait AssignmentPolicy {
    /// `position` 为患者在筛选后列表中的位置
    fn assign(&mut self, position: usize, patient: &Patient) -> TriageAssignment;

    /// 重新构建队列前更新参考时间
    fn set_reference_time(&mut self, _now: DateTime<Utc>) {}
}

impl<F> AssignmentPolicy for F
where
    F: FnMut(usize, &Patient) -> TriageAssignment,
{
    fn assign(&mut self, position: usize, patient: &Patient) -> TriageAssignment {
        self(position, patient)
    }
}

fn staggered_arrival(now: DateTime<Utc>, position: usize, interval_minutes: u32) -> DateTime<Utc> {
    let offset = i64::from(interval_minutes).saturating_mul(position as i64);
    now - Duration::minutes(offset)
}

/// 使用登记时记录的分诊级别，缺省时使用默认级别
#[derive(Debug, Clone)]
pub struct RecordedPolicy {
    now: DateTime<Utc>,
    default_priority: TriagePriority,
    arrival_interval_minutes: u32,
}

impl RecordedPolicy {
    pub fn new(now: DateTime<Utc>, default_priority: TriagePriority, arrival_interval_minutes: u32) -> Self {
        Self {
            now,
            default_priority,
            arrival_interval_minutes,
        }
    }
}

impl AssignmentPolicy for RecordedPolicy {
    fn assign(&mut self, position: usize, patient: &Patient) -> TriageAssignment {
        let arrival_time = staggered_arrival(self.now, position, self.arrival_interval_minutes);
        TriageAssignment {
            priority: patient.triage_priority.unwrap_or(self.default_priority),
            arrival_time,
            wait_time_minutes: minutes_between(arrival_time, self.now),
        }
    }

    fn set_reference_time(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

/// 以固定种子随机抽取级别和等待时长，用于演示数据
#[derive(Debug, Clone)]
pub struct SimulatedPolicy {
    now: DateTime<Utc>,
    rng: StdRng,
}

impl SimulatedPolicy {
    pub fn new(now: DateTime<Utc>, seed: u64) -> Self {
        Self {
            now,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AssignmentPolicy for SimulatedPolicy {
    fn assign(&mut self, position: usize, _patient: &Patient) -> TriageAssignment {
        let priority = TriagePriority::ALL[self.rng.random_range(0..TriagePriority::ALL.len())];
        let wait_time_minutes = self.rng.random_range(15..135);
        TriageAssignment {
            priority,
            arrival_time: staggered_arrival(self.now, position, SIMULATED_ARRIVAL_INTERVAL_MINUTES),
            wait_time_minutes,
        }
    }

    fn set_reference_time(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}
