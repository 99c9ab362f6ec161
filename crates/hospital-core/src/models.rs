//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::triage::TriagePriority;

/// 患者基本信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,                            // 患者编号 (P001)
    pub name: String,                          // 患者姓名
    pub date_of_birth: Option<NaiveDate>,      // 出生日期
    pub gender: Option<Gender>,                // 性别
    #[serde(default)]
    pub contact: String,                       // 联系电话
    pub emergency_contact: Option<String>,     // 紧急联系人
    pub blood_type: Option<String>,            // 血型
    #[serde(default)]
    pub allergies: Vec<String>,                // 过敏史
    pub current_ward: Option<Ward>,            // 当前病区
    pub status: PatientStatus,                 // 患者状态
    pub bed_number: Option<String>,            // 床位号
    pub chief_complaint: Option<String>,       // 主诉
    pub triage_priority: Option<TriagePriority>, // 登记时的分诊级别
    pub vital_signs: Option<VitalSigns>,       // 生命体征
    pub admission_date: Option<NaiveDate>,     // 入院日期
}

impl Patient {
    /// 是否属于急诊视图（在急诊病区或处于危重状态）
    pub fn is_emergency_relevant(&self) -> bool {
        self.current_ward == Some(Ward::Emergency) || self.status == PatientStatus::Critical
    }
}

/// 性别枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// 患者状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Critical,   // 危重
    Stable,     // 稳定
    Discharged, // 已出院
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientStatus::Critical => write!(f, "Critical"),
            PatientStatus::Stable => write!(f, "Stable"),
            PatientStatus::Discharged => write!(f, "Discharged"),
        }
    }
}

/// 生命体征
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub blood_pressure: Option<String>, // 血压，如 120/80
    pub heart_rate: Option<u32>,        // 心率 (bpm)
    pub temperature: Option<f64>,       // 体温 (°F)
    pub respiratory_rate: Option<u32>,  // 呼吸频率
    pub oxygen_saturation: Option<u32>, // 血氧饱和度 (%)
}

/// 病区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ward {
    Emergency,
    #[serde(rename = "ICU")]
    Icu,
    General,
    Cardiology,
    Maternity,
}

impl Ward {
    /// 所有病区，按看板展示顺序
    pub const ALL: [Ward; 5] = [
        Ward::Icu,
        Ward::General,
        Ward::Emergency,
        Ward::Cardiology,
        Ward::Maternity,
    ];
}

impl fmt::Display for Ward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ward::Emergency => "Emergency",
            Ward::Icu => "ICU",
            Ward::General => "General",
            Ward::Cardiology => "Cardiology",
            Ward::Maternity => "Maternity",
        };
        f.pad(name)
    }
}

/// 床位信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    pub id: String,                          // 床位编号 (B001)
    pub number: String,                      // 床号 (E01)
    pub ward: Ward,
    pub status: BedStatus,
    pub patient_id: Option<String>,          // 占用患者编号
    pub last_cleaned: Option<DateTime<Utc>>, // 最近清洁时间
}

/// 床位状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BedStatus {
    Available,   // 空闲
    Occupied,    // 占用
    Maintenance, // 维护中
}

/// 科室
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Cardiology,
    #[serde(rename = "General Medicine")]
    GeneralMedicine,
    Orthopedics,
    Obstetrics,
    Emergency,
    #[serde(rename = "ICU")]
    Icu,
    Administration,
}

impl Department {
    /// 所有科室，按科室看板顺序
    pub const ALL: [Department; 7] = [
        Department::Cardiology,
        Department::GeneralMedicine,
        Department::Orthopedics,
        Department::Obstetrics,
        Department::Emergency,
        Department::Icu,
        Department::Administration,
    ];

    /// 科室对应的病区，没有住院床位的科室为空
    pub const fn ward(self) -> Option<Ward> {
        match self {
            Department::Cardiology => Some(Ward::Cardiology),
            Department::GeneralMedicine => Some(Ward::General),
            Department::Obstetrics => Some(Ward::Maternity),
            Department::Emergency => Some(Ward::Emergency),
            Department::Icu => Some(Ward::Icu),
            Department::Orthopedics | Department::Administration => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Department::Cardiology => "Cardiology",
            Department::GeneralMedicine => "General Medicine",
            Department::Orthopedics => "Orthopedics",
            Department::Obstetrics => "Obstetrics",
            Department::Emergency => "Emergency",
            Department::Icu => "ICU",
            Department::Administration => "Administration",
        };
        f.pad(name)
    }
}

/// 医护人员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,                     // 人员编号 (D001 / N002 / A003)
    pub name: String,
    pub role: StaffRole,
    pub department: Department,
    pub specialization: Option<String>, // 专业方向
    pub shift: Shift,
    #[serde(default)]
    pub contact: String,
    pub email: Option<String>,
}

/// 岗位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Doctor,
    Nurse,
    Surgeon,
    Administrator,
}

impl StaffRole {
    /// 人员编号前缀：医生 D，护士 N，其余 A
    pub const fn code_prefix(self) -> char {
        match self {
            StaffRole::Doctor => 'D',
            StaffRole::Nurse => 'N',
            StaffRole::Surgeon | StaffRole::Administrator => 'A',
        }
    }
}

/// 班次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Day,
    Evening,
    Night,
}

/// 预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,                    // 预约编号 (A001)
    pub patient_id: String,
    pub doctor_id: String,
    pub department: Department,
    pub date_time: NaiveDateTime,      // 预约时间（本地时间）
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub appointment_type: String,      // 就诊类型，如 Consultation
    #[serde(default)]
    pub notes: String,
    pub status: AppointmentStatus,
}

/// 预约状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(ward: Option<Ward>, status: PatientStatus) -> Patient {
        Patient {
            id: "P001".to_string(),
            name: "Test".to_string(),
            date_of_birth: None,
            gender: None,
            contact: String::new(),
            emergency_contact: None,
            blood_type: None,
            allergies: Vec::new(),
            current_ward: ward,
            status,
            bed_number: None,
            chief_complaint: None,
            triage_priority: None,
            vital_signs: None,
            admission_date: None,
        }
    }

    #[test]
    fn test_emergency_relevance() {
        assert!(patient(Some(Ward::Emergency), PatientStatus::Stable).is_emergency_relevant());
        assert!(patient(Some(Ward::General), PatientStatus::Critical).is_emergency_relevant());
        assert!(patient(None, PatientStatus::Critical).is_emergency_relevant());
        assert!(!patient(Some(Ward::Icu), PatientStatus::Stable).is_emergency_relevant());
        assert!(!patient(None, PatientStatus::Discharged).is_emergency_relevant());
    }

    #[test]
    fn test_patient_json_shape() {
        let json = r#"{
            "id": "P007",
            "name": "Ada Byron",
            "currentWard": "ICU",
            "status": "Stable",
            "bedNumber": "I02",
            "triagePriority": "High"
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.current_ward, Some(Ward::Icu));
        assert_eq!(patient.triage_priority, Some(TriagePriority::High));
        assert_eq!(patient.bed_number.as_deref(), Some("I02"));
        assert!(patient.allergies.is_empty());
        assert!(patient.contact.is_empty());
    }

    #[test]
    fn test_department_names_and_wards() {
        let department: Department = serde_json::from_str("\"General Medicine\"").unwrap();
        assert_eq!(department, Department::GeneralMedicine);
        assert_eq!(department.ward(), Some(Ward::General));
        assert_eq!(Department::Icu.to_string(), "ICU");
        assert_eq!(Department::Administration.ward(), None);
    }

    #[test]
    fn test_staff_code_prefix() {
        assert_eq!(StaffRole::Doctor.code_prefix(), 'D');
        assert_eq!(StaffRole::Nurse.code_prefix(), 'N');
        assert_eq!(StaffRole::Surgeon.code_prefix(), 'A');
        assert_eq!(StaffRole::Administrator.code_prefix(), 'A');
    }

    #[test]
    fn test_appointment_json_shape() {
        let json = r#"{
            "id": "A001",
            "patientId": "P002",
            "doctorId": "D001",
            "department": "Cardiology",
            "dateTime": "2026-10-17T09:30:00",
            "duration": 45,
            "type": "Follow-up",
            "status": "Scheduled"
        }"#;

        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.duration_minutes, 45);
        assert_eq!(appointment.appointment_type, "Follow-up");
        assert!(appointment.notes.is_empty());
        assert_eq!(appointment.date_time.to_string(), "2026-10-17 09:30:00");
    }

    #[test]
    fn test_ward_display() {
        assert_eq!(Ward::Icu.to_string(), "ICU");
        assert_eq!(Ward::Emergency.to_string(), "Emergency");
    }
}
