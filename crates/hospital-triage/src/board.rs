//! 急诊看板
//!
//! 持有患者和床位登记表以及当前分诊队列，协调急诊收治和分诊级别调整。
//! 队列是普通值，每次操作后整体替换。

use chrono::{NaiveDate, Utc};
use hospital_core::{
    Bed, BedStatus, Gender, Patient, PatientStatus, Result, TriagePriority, VitalSigns, Ward,
};
use hospital_records::{BedRegistry, NewPatient, PatientRegistry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::AssignmentPolicy;
use crate::queue::{build_queue, set_priority, TriageQueue};
use crate::stats::TriageStats;

/// 急诊收治请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAdmission {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub contact: String,
    pub emergency_contact: Option<String>,
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub chief_complaint: Option<String>,
    #[serde(default = "default_admission_priority")]
    pub triage_priority: TriagePriority,
    pub vital_signs: Option<VitalSigns>,
}

fn default_admission_priority() -> TriagePriority {
    TriagePriority::Low
}

impl EmergencyAdmission {
    pub fn new(name: impl Into<String>, triage_priority: TriagePriority) -> Self {
        Self {
            name: name.into(),
            date_of_birth: None,
            gender: None,
            contact: String::new(),
            emergency_contact: None,
            blood_type: None,
            allergies: Vec::new(),
            chief_complaint: None,
            triage_priority,
            vital_signs: None,
        }
    }

    fn into_new_patient(self, bed_number: Option<String>) -> NewPatient {
        NewPatient {
            name: self.name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            contact: self.contact,
            emergency_contact: self.emergency_contact,
            blood_type: self.blood_type,
            allergies: self.allergies,
            current_ward: Some(Ward::Emergency),
            status: PatientStatus::Critical,
            bed_number,
            chief_complaint: self.chief_complaint,
            triage_priority: Some(self.triage_priority),
            vital_signs: self.vital_signs,
        }
    }
}

/// 收治结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionOutcome {
    pub admission_id: Uuid,
    pub patient: Patient,
    /// 无空闲急诊床位时为空
    pub bed: Option<Bed>,
}

/// 急诊概览
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyOverview {
    pub stats: TriageStats,
    pub available_beds: usize,
    pub occupied_beds: usize,
}

/// 急诊看板
pub struct EmergencyBoard {
    patients: PatientRegistry,
    beds: BedRegistry,
    policy: Box<dyn AssignmentPolicy + Send>,
    queue: TriageQueue,
}

impl EmergencyBoard {
    /// 创建看板并构建初始队列
    pub fn new(
        patients: PatientRegistry,
        beds: BedRegistry,
        policy: impl AssignmentPolicy + Send + 'static,
    ) -> Self {
        let mut board = Self {
            patients,
            beds,
            policy: Box::new(policy),
            queue: TriageQueue::default(),
        };
        board.reload();
        board
    }

    /// 从登记表整体重建队列，之前的手动调整全部丢弃
    pub fn reload(&mut self) -> &TriageQueue {
        self.policy.set_reference_time(Utc::now());
        self.queue = build_queue(self.patients.get_all(), self.policy.as_mut());
        tracing::info!("Triage queue rebuilt with {} patients", self.queue.len());
        &self.queue
    }

    pub fn queue(&self) -> &TriageQueue {
        &self.queue
    }

    pub fn patients(&self) -> &PatientRegistry {
        &self.patients
    }

    pub fn beds(&self) -> &BedRegistry {
        &self.beds
    }

    /// 调整分诊级别，返回患者是否在队列中
    pub fn set_priority(&mut self, patient_id: &str, priority: TriagePriority) -> bool {
        let found = self.queue.position(patient_id).is_some();
        self.queue = set_priority(&self.queue, patient_id, priority);

        if found {
            tracing::info!("Triage priority for {} updated to {}", patient_id, priority);
        }
        found
    }

    /// 急诊收治：登记患者、分配首个空闲急诊床位，然后重建队列
    pub fn admit(&mut self, admission: EmergencyAdmission) -> Result<AdmissionOutcome> {
        let admission_id = Uuid::new_v4();
        let free_bed = self
            .beds
            .first_available(Ward::Emergency)
            .map(|bed| (bed.id.clone(), bed.number.clone()));

        let bed_number = free_bed.as_ref().map(|(_, number)| number.clone());
        let patient = self.patients.create(admission.into_new_patient(bed_number))?;

        let bed = match free_bed {
            Some((bed_id, _)) => Some(self.beds.assign_patient(&bed_id, &patient.id)?),
            None => {
                tracing::warn!(
                    "No emergency bed available, patient {} admitted without a bed",
                    patient.id
                );
                None
            }
        };

        tracing::info!(
            "Emergency admission {} completed for patient {}",
            admission_id,
            patient.id
        );
        self.reload();

        Ok(AdmissionOutcome {
            admission_id,
            patient,
            bed,
        })
    }

    /// 急诊病区床位
    pub fn emergency_beds(&self) -> Vec<&Bed> {
        self.beds.by_ward(Ward::Emergency)
    }

    /// 急诊概览
    pub fn overview(&self) -> EmergencyOverview {
        let beds = self.emergency_beds();
        let count = |status: BedStatus| beds.iter().filter(|b| b.status == status).count();

        EmergencyOverview {
            stats: TriageStats::from_queue(&self.queue),
            available_beds: count(BedStatus::Available),
            occupied_beds: count(BedStatus::Occupied),
        }
    }
}

impl std::fmt::Debug for EmergencyBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmergencyBoard")
            .field("patients", &self.patients.len())
            .field("beds", &self.beds.get_all().len())
            .field("queue", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RecordedPolicy;

    fn bed(id: &str, number: &str, status: BedStatus) -> Bed {
        Bed {
            id: id.to_string(),
            number: number.to_string(),
            ward: Ward::Emergency,
            status,
            patient_id: None,
            last_cleaned: None,
        }
    }

    fn board_with_beds(beds: Vec<Bed>) -> EmergencyBoard {
        let mut patients = PatientRegistry::new();
        let mut walk_in = NewPatient::new("Walk In", PatientStatus::Stable);
        walk_in.current_ward = Some(Ward::Emergency);
        walk_in.triage_priority = Some(TriagePriority::Medium);
        patients.create(walk_in).unwrap();

        let mut icu = NewPatient::new("ICU Case", PatientStatus::Critical);
        icu.current_ward = Some(Ward::Icu);
        icu.triage_priority = Some(TriagePriority::High);
        patients.create(icu).unwrap();

        patients.create(NewPatient::new("Outpatient", PatientStatus::Stable)).unwrap();

        EmergencyBoard::new(
            patients,
            BedRegistry::from_records(beds),
            RecordedPolicy::new(Utc::now(), TriagePriority::Low, 30),
        )
    }

    #[test]
    fn test_initial_queue() {
        let board = board_with_beds(Vec::new());
        assert_eq!(board.queue().ids(), vec!["P002", "P001"]);
    }

    #[test]
    fn test_set_priority_reports_miss() {
        let mut board = board_with_beds(Vec::new());
        assert!(board.set_priority("P001", TriagePriority::Critical));
        assert_eq!(board.queue().ids(), vec!["P001", "P002"]);

        let before = board.queue().clone();
        assert!(!board.set_priority("P003", TriagePriority::Critical));
        assert_eq!(board.queue(), &before);
    }

    #[test]
    fn test_reload_discards_manual_overrides() {
        let mut board = board_with_beds(Vec::new());
        board.set_priority("P001", TriagePriority::Critical);
        board.reload();
        assert_eq!(board.queue().get("P001").unwrap().priority, TriagePriority::Medium);
    }

    #[test]
    fn test_admit_assigns_first_available_bed() {
        let mut board = board_with_beds(vec![
            bed("B001", "E01", BedStatus::Occupied),
            bed("B002", "E02", BedStatus::Available),
            bed("B003", "E03", BedStatus::Available),
        ]);

        let outcome = board
            .admit(EmergencyAdmission::new("Trauma Case", TriagePriority::Critical))
            .unwrap();

        assert_eq!(outcome.patient.id, "P004");
        assert_eq!(outcome.patient.current_ward, Some(Ward::Emergency));
        assert_eq!(outcome.patient.status, PatientStatus::Critical);
        assert_eq!(outcome.patient.bed_number.as_deref(), Some("E02"));

        let bed = outcome.bed.unwrap();
        assert_eq!(bed.id, "B002");
        assert_eq!(bed.patient_id.as_deref(), Some("P004"));

        assert_eq!(board.queue().ids()[0], "P004");
        let overview = board.overview();
        assert_eq!(overview.available_beds, 1);
        assert_eq!(overview.occupied_beds, 2);
        assert_eq!(overview.stats.queue_length, 3);
        assert_eq!(overview.stats.critical_patients, 1);
    }

    #[test]
    fn test_admit_without_free_bed() {
        let mut board = board_with_beds(vec![bed("B001", "E01", BedStatus::Maintenance)]);

        let outcome = board
            .admit(EmergencyAdmission::new("Late Arrival", TriagePriority::Low))
            .unwrap();

        assert!(outcome.bed.is_none());
        assert!(outcome.patient.bed_number.is_none());
        assert_eq!(board.queue().ids(), vec!["P002", "P001", "P004"]);
    }

    #[test]
    fn test_admit_rejects_blank_name() {
        let mut board = board_with_beds(vec![bed("B001", "E01", BedStatus::Available)]);
        assert!(board.admit(EmergencyAdmission::new("", TriagePriority::High)).is_err());
        assert_eq!(board.beds().available().len(), 1);
    }

    #[test]
    fn test_admission_request_defaults_to_low() {
        let admission: EmergencyAdmission = serde_json::from_str(r#"{"name": "Eve"}"#).unwrap();
        assert_eq!(admission.triage_priority, TriagePriority::Low);
    }
}
