//! 分诊级别
//!
//! 急诊分诊队列使用的四级优先级。级别只作为排序键，不承载临床语义。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HospitalError;

/// 分诊级别，声明顺序即排序顺序：Critical < High < Medium < Low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriagePriority {
    Critical, // 危急
    High,     // 紧急
    Medium,   // 次紧急
    Low,      // 非紧急
}

impl TriagePriority {
    /// 所有级别，按排序名次排列
    pub const ALL: [TriagePriority; 4] = [
        TriagePriority::Critical,
        TriagePriority::High,
        TriagePriority::Medium,
        TriagePriority::Low,
    ];

    /// 排序名次，数值越小越靠前
    pub const fn rank(self) -> u8 {
        match self {
            TriagePriority::Critical => 0,
            TriagePriority::High => 1,
            TriagePriority::Medium => 2,
            TriagePriority::Low => 3,
        }
    }

    /// 级别说明
    pub const fn description(self) -> &'static str {
        match self {
            TriagePriority::Critical => "Immediate attention required",
            TriagePriority::High => "Urgent, within 15 minutes",
            TriagePriority::Medium => "Semi-urgent, within 60 minutes",
            TriagePriority::Low => "Non-urgent, within 120 minutes",
        }
    }

    /// 目标响应时间（分钟）
    pub const fn target_response_minutes(self) -> u32 {
        match self {
            TriagePriority::Critical => 0,
            TriagePriority::High => 15,
            TriagePriority::Medium => 60,
            TriagePriority::Low => 120,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TriagePriority::Critical => "Critical",
            TriagePriority::High => "High",
            TriagePriority::Medium => "Medium",
            TriagePriority::Low => "Low",
        }
    }
}

impl fmt::Display for TriagePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TriagePriority {
    type Err = HospitalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(TriagePriority::Critical),
            "high" => Ok(TriagePriority::High),
            "medium" => Ok(TriagePriority::Medium),
            "low" => Ok(TriagePriority::Low),
            _ => Err(HospitalError::Validation(format!(
                "Invalid triage priority '{}', expected one of: Critical, High, Medium, Low",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_declaration_order() {
        for (index, priority) in TriagePriority::ALL.iter().enumerate() {
            assert_eq!(priority.rank() as usize, index);
        }
        assert!(TriagePriority::Critical < TriagePriority::High);
        assert!(TriagePriority::Medium < TriagePriority::Low);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!("critical".parse::<TriagePriority>().unwrap(), TriagePriority::Critical);
        assert_eq!(" High ".parse::<TriagePriority>().unwrap(), TriagePriority::High);
        assert_eq!("LOW".parse::<TriagePriority>().unwrap(), TriagePriority::Low);
        assert!("urgent".parse::<TriagePriority>().is_err());
        assert!("".parse::<TriagePriority>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for priority in TriagePriority::ALL {
            assert_eq!(priority.to_string().parse::<TriagePriority>().unwrap(), priority);
        }
    }

    #[test]
    fn test_target_response_minutes() {
        assert_eq!(TriagePriority::Critical.target_response_minutes(), 0);
        assert_eq!(TriagePriority::High.target_response_minutes(), 15);
        assert_eq!(TriagePriority::Medium.target_response_minutes(), 60);
        assert_eq!(TriagePriority::Low.target_response_minutes(), 120);
    }
}
