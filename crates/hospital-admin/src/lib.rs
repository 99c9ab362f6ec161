//! # 医院管理模块
//!
//! 提供配置管理、日志初始化和分诊队列监控等运维功能

pub mod config;
pub mod logging;
pub mod monitoring;

pub use config::{ConfigManager, HospitalConfig, PolicyKind};
pub use logging::init_logging;
pub use monitoring::TriageMetrics;
