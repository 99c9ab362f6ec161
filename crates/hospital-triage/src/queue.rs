//! 急诊分诊队列
//!
//! 队列始终按分诊级别名次升序排列（Critical → Low），同级患者保持原有相对顺序。
//! 所有操作都返回新的队列值，不修改输入。

use chrono::{DateTime, Utc};
use hospital_core::{Patient, TriagePriority};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::policy::AssignmentPolicy;

/// 分诊队列中的患者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriagePatient {
    pub id: String,
    pub name: String,
    pub arrival_time: DateTime<Utc>,
    pub priority: TriagePriority,
    pub wait_time_minutes: u32,
}

impl TriagePatient {
    /// 等待时间是否已超过该级别的目标响应时间
    pub fn is_overdue(&self) -> bool {
        self.wait_time_minutes > self.priority.target_response_minutes()
    }
}

/// 分诊队列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriageQueue {
    entries: Vec<TriagePatient>,
}

impl TriageQueue {
    /// 由任意顺序的条目构建队列：重复编号只保留首条，然后稳定排序
    pub fn from_entries(entries: Vec<TriagePatient>) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<TriagePatient> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect();
        sort_by_rank(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[TriagePatient] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TriagePatient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TriagePatient> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// 患者在队列中的位置（0起）
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<TriagePatient> {
        self.entries
    }

    /// 修改分诊级别，见 [`set_priority`]
    pub fn with_priority(&self, id: &str, priority: TriagePriority) -> Self {
        set_priority(self, id, priority)
    }
}

impl<'a> IntoIterator for &'a TriageQueue {
    type Item = &'a TriagePatient;
    type IntoIter = std::slice::Iter<'a, TriagePatient>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// `sort_by_key` 为稳定排序，同级条目不会交换位置
fn sort_by_rank(entries: &mut [TriagePatient]) {
    entries.sort_by_key(|entry| entry.priority.rank());
}

/// 从全部患者构建分诊队列
///
/// 只保留在急诊病区或处于危重状态的患者，由 `policy` 分配到达时间、级别和等待时长，
/// 再按级别稳定排序。同一编号重复出现时只取第一条。输入为空时返回空队列。
pub fn build_queue<P>(patients: &[Patient], policy: &mut P) -> TriageQueue
where
    P: AssignmentPolicy + ?Sized,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries: Vec<TriagePatient> = patients
        .iter()
        .filter(|patient| patient.is_emergency_relevant())
        .filter(|patient| seen.insert(patient.id.as_str()))
        .enumerate()
        .map(|(position, patient)| {
            let assignment = policy.assign(position, patient);
            TriagePatient {
                id: patient.id.clone(),
                name: patient.name.clone(),
                arrival_time: assignment.arrival_time,
                priority: assignment.priority,
                wait_time_minutes: assignment.wait_time_minutes,
            }
        })
        .collect();

    sort_by_rank(&mut entries);

    tracing::debug!(
        "Built triage queue with {} of {} patients",
        entries.len(),
        patients.len()
    );
    TriageQueue { entries }
}

/// 修改指定患者的分诊级别并重新排序
///
/// 编号不在队列中时视为调用方竞争（患者已被移出），原样返回队列。
pub fn set_priority(queue: &TriageQueue, id: &str, priority: TriagePriority) -> TriageQueue {
    let Some(index) = queue.position(id) else {
        tracing::debug!("Triage priority update ignored, patient {} is not queued", id);
        return queue.clone();
    };

    let mut entries = queue.entries.clone();
    entries[index].priority = priority;
    sort_by_rank(&mut entries);

    TriageQueue { entries }
}
