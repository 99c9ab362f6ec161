//! 患者登记表
//!
//! 内存中的患者记录，保持插入顺序（分诊队列的同级排序依赖该顺序）。

use chrono::{NaiveDate, Utc};
use hospital_core::utils::RecordSequence;
use hospital_core::{
    Gender, HospitalError, Patient, PatientStatus, Result, TriagePriority, VitalSigns, Ward,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 新建患者请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub contact: String,
    pub emergency_contact: Option<String>,
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub current_ward: Option<Ward>,
    pub status: PatientStatus,
    pub bed_number: Option<String>,
    pub chief_complaint: Option<String>,
    pub triage_priority: Option<TriagePriority>,
    pub vital_signs: Option<VitalSigns>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, status: PatientStatus) -> Self {
        Self {
            name: name.into(),
            date_of_birth: None,
            gender: None,
            contact: String::new(),
            emergency_contact: None,
            blood_type: None,
            allergies: Vec::new(),
            current_ward: None,
            status,
            bed_number: None,
            chief_complaint: None,
            triage_priority: None,
            vital_signs: None,
        }
    }
}

/// 患者更新请求，未设置的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub current_ward: Option<Ward>,
    pub status: Option<PatientStatus>,
    pub bed_number: Option<String>,
    pub chief_complaint: Option<String>,
    pub triage_priority: Option<TriagePriority>,
    pub vital_signs: Option<VitalSigns>,
}

/// 患者登记表
#[derive(Debug)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
    sequence: RecordSequence,
}

impl PatientRegistry {
    /// 创建空登记表
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            sequence: RecordSequence::new(),
        }
    }

    /// 从已有记录构建登记表，重复编号只保留首条
    pub fn from_records(records: Vec<Patient>) -> Self {
        let mut registry = Self::new();
        let mut seen = HashSet::with_capacity(records.len());
        for patient in records {
            if !seen.insert(patient.id.clone()) {
                tracing::warn!("Skipping duplicate patient record {}", patient.id);
                continue;
            }
            registry.sequence.observe(&patient.id);
            registry.patients.push(patient);
        }
        tracing::debug!("Loaded {} patient records", registry.patients.len());
        registry
    }

    /// 所有患者（插入顺序）
    pub fn get_all(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// 按编号获取患者
    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// 新建患者，分配下一个编号并记录入院日期
    pub fn create(&mut self, request: NewPatient) -> Result<Patient> {
        if request.name.trim().is_empty() {
            return Err(HospitalError::Validation("Patient name cannot be empty".to_string()));
        }

        let patient = Patient {
            id: self.sequence.next_code('P')?,
            name: request.name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            contact: request.contact,
            emergency_contact: request.emergency_contact,
            blood_type: request.blood_type,
            allergies: request.allergies,
            current_ward: request.current_ward,
            status: request.status,
            bed_number: request.bed_number,
            chief_complaint: request.chief_complaint,
            triage_priority: request.triage_priority,
            vital_signs: request.vital_signs,
            admission_date: Some(Utc::now().date_naive()),
        };

        tracing::info!("Created patient {} ({})", patient.id, patient.name);
        self.patients.push(patient.clone());
        Ok(patient)
    }

    /// 更新患者
    pub fn update(&mut self, id: &str, update: PatientUpdate) -> Result<Patient> {
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Patient {} not found", id)))?;

        if let Some(name) = update.name {
            patient.name = name;
        }
        if let Some(contact) = update.contact {
            patient.contact = contact;
        }
        if let Some(ward) = update.current_ward {
            patient.current_ward = Some(ward);
        }
        if let Some(status) = update.status {
            patient.status = status;
        }
        if let Some(bed_number) = update.bed_number {
            patient.bed_number = Some(bed_number);
        }
        if let Some(complaint) = update.chief_complaint {
            patient.chief_complaint = Some(complaint);
        }
        if let Some(priority) = update.triage_priority {
            patient.triage_priority = Some(priority);
        }
        if let Some(vitals) = update.vital_signs {
            patient.vital_signs = Some(vitals);
        }

        tracing::info!("Updated patient {}", id);
        Ok(patient.clone())
    }

    /// 删除患者
    pub fn delete(&mut self, id: &str) -> Result<Patient> {
        let index = self
            .patients
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Patient {} not found", id)))?;

        let removed = self.patients.remove(index);
        tracing::info!("Removed patient {}", id);
        Ok(removed)
    }

    /// 搜索患者：姓名和编号不区分大小写，联系电话按原样匹配
    pub fn search(&self, query: &str) -> Vec<&Patient> {
        let lower_query = query.to_lowercase();
        self.patients
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&lower_query)
                    || p.id.to_lowercase().contains(&lower_query)
                    || p.contact.contains(query)
            })
            .collect()
    }

    /// 按状态筛选
    pub fn by_status(&self, status: PatientStatus) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.status == status).collect()
    }
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
