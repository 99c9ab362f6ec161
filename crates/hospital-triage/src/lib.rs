//! # 急诊分诊模块
//!
//! 提供急诊科分诊队列管理功能，包括：
//! - 分诊队列：按分诊级别稳定排序的患者队列，支持手动调整级别
//! - 分配策略：为队列中的患者分配到达时间、级别和等待时长
//! - 队列统计：危急患者数、平均等待时间等
//! - 急诊看板：持有当前队列，协调急诊收治和床位分配

pub mod board;
pub mod policy;
pub mod queue;
pub mod stats;

// 重新导出主要类型
pub use board::{AdmissionOutcome, EmergencyAdmission, EmergencyBoard, EmergencyOverview};
pub use hospital_core::TriagePriority;
pub use policy::{AssignmentPolicy, RecordedPolicy, SimulatedPolicy, TriageAssignment};
pub use queue::{build_queue, set_priority, TriagePatient, TriageQueue};
pub use stats::TriageStats;
