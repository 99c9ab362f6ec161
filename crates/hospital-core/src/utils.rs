//! 通用工具函数

use chrono::{DateTime, Utc};

use crate::error::{HospitalError, Result};

/// 生成记录编号，如 `P001`、`B012`
pub fn format_record_code(prefix: char, seq: u32) -> String {
    format!("{}{:03}", prefix, seq)
}

/// 解析记录编号中的序号部分
pub fn parse_record_seq(code: &str) -> Option<u32> {
    let digits = code.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 记录编号序列
///
/// 编号按前缀加三位以上序号生成。已加载记录中的最大序号决定下一个编号，
/// 序号用尽时返回错误而不是回绕。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSequence {
    next: u32,
}

impl RecordSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// 登记一个已有编号，保证之后生成的编号大于它
    pub fn observe(&mut self, code: &str) {
        let Some(seq) = parse_record_seq(code) else {
            return;
        };
        match seq.checked_add(1) {
            Some(next) => self.next = self.next.max(next),
            None => tracing::warn!("Record code {} is at the sequence limit, ignored for numbering", code),
        }
    }

    /// 下一个序号（尚未分配）
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// 分配下一个编号
    pub fn next_code(&mut self, prefix: char) -> Result<String> {
        let seq = self.next;
        self.next = seq.checked_add(1).ok_or_else(|| {
            HospitalError::Internal(format!("Record sequence for '{}' is exhausted", prefix))
        })?;
        Ok(format_record_code(prefix, seq))
    }
}

impl Default for RecordSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// 两个时间点之间经过的整分钟数，时间倒置时为0
pub fn minutes_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u32 {
    let minutes = later.signed_duration_since(earlier).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_record_code() {
        assert_eq!(format_record_code('P', 1), "P001");
        assert_eq!(format_record_code('B', 42), "B042");
        assert_eq!(format_record_code('P', 1234), "P1234");
    }

    #[test]
    fn test_parse_record_seq() {
        assert_eq!(parse_record_seq("P001"), Some(1));
        assert_eq!(parse_record_seq("B120"), Some(120));
        assert_eq!(parse_record_seq("P"), None);
        assert_eq!(parse_record_seq("P12a"), None);
    }

    #[test]
    fn test_record_sequence_follows_highest_code() {
        let mut sequence = RecordSequence::new();
        sequence.observe("P007");
        sequence.observe("P003");
        sequence.observe("walk-in");
        assert_eq!(sequence.next_code('P').unwrap(), "P008");
        assert_eq!(sequence.next_code('P').unwrap(), "P009");
    }

    #[test]
    fn test_record_sequence_at_limit() {
        let mut sequence = RecordSequence::new();
        sequence.observe("P4294967295");
        assert_eq!(sequence.peek(), 1);

        sequence.observe("P4294967294");
        assert_eq!(sequence.peek(), u32::MAX);
        assert!(matches!(sequence.next_code('P'), Err(HospitalError::Internal(_))));
        assert_eq!(sequence.peek(), u32::MAX);
    }

    #[test]
    fn test_minutes_between() {
        let now = Utc::now();
        assert_eq!(minutes_between(now - Duration::minutes(45), now), 45);
        assert_eq!(minutes_between(now, now - Duration::minutes(5)), 0);
    }
}
