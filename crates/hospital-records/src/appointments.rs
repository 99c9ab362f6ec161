//! 预约登记表
//!
//! 新建的预约状态总是 `Scheduled`。预约时间为本地时间，不带时区。

use chrono::{NaiveDate, NaiveDateTime};
use hospital_core::utils::RecordSequence;
use hospital_core::{Appointment, AppointmentStatus, Department, HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 新建预约请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: String,
    pub doctor_id: String,
    pub department: Department,
    pub date_time: NaiveDateTime,
    #[serde(rename = "duration", default = "default_duration_minutes")]
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub notes: String,
}

fn default_duration_minutes() -> u32 {
    30
}

/// 预约更新请求，未设置的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    pub doctor_id: Option<String>,
    pub department: Option<Department>,
    pub date_time: Option<NaiveDateTime>,
    #[serde(rename = "duration")]
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// 预约登记表
#[derive(Debug, Default)]
pub struct AppointmentRegistry {
    appointments: Vec<Appointment>,
    sequence: RecordSequence,
}

impl AppointmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有记录构建，重复编号只保留首条
    pub fn from_records(records: Vec<Appointment>) -> Self {
        let mut registry = Self::new();
        let mut seen = HashSet::with_capacity(records.len());
        for appointment in records {
            if !seen.insert(appointment.id.clone()) {
                tracing::warn!("Skipping duplicate appointment record {}", appointment.id);
                continue;
            }
            registry.sequence.observe(&appointment.id);
            registry.appointments.push(appointment);
        }
        tracing::debug!("Loaded {} appointment records", registry.appointments.len());
        registry
    }

    pub fn get_all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// 新建预约
    pub fn create(&mut self, request: NewAppointment) -> Result<Appointment> {
        if request.patient_id.trim().is_empty() {
            return Err(HospitalError::Validation(
                "Appointment requires a patient".to_string(),
            ));
        }

        let appointment = Appointment {
            id: self.sequence.next_code('A')?,
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            department: request.department,
            date_time: request.date_time,
            duration_minutes: request.duration_minutes,
            appointment_type: request.appointment_type,
            notes: request.notes,
            status: AppointmentStatus::Scheduled,
        };

        tracing::info!(
            "Scheduled appointment {} for patient {} at {}",
            appointment.id,
            appointment.patient_id,
            appointment.date_time
        );
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    pub fn update(&mut self, id: &str, update: AppointmentUpdate) -> Result<Appointment> {
        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Appointment {} not found", id)))?;

        if let Some(doctor_id) = update.doctor_id {
            appointment.doctor_id = doctor_id;
        }
        if let Some(department) = update.department {
            appointment.department = department;
        }
        if let Some(date_time) = update.date_time {
            appointment.date_time = date_time;
        }
        if let Some(duration) = update.duration_minutes {
            appointment.duration_minutes = duration;
        }
        if let Some(notes) = update.notes {
            appointment.notes = notes;
        }
        if let Some(status) = update.status {
            appointment.status = status;
        }

        tracing::info!("Updated appointment {}", id);
        Ok(appointment.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<Appointment> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Appointment {} not found", id)))?;

        let removed = self.appointments.remove(index);
        tracing::info!("Removed appointment {}", id);
        Ok(removed)
    }

    /// 时间区间内的预约，两端均包含
    pub fn by_date_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.date_time >= start && a.date_time <= end)
            .collect()
    }

    pub fn by_department(&self, department: Department) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.department == department)
            .collect()
    }

    /// 指定日期的预约
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.date_time.date() == date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap()
    }

    fn request(patient_id: &str, department: Department, date_time: &str) -> NewAppointment {
        NewAppointment {
            patient_id: patient_id.to_string(),
            doctor_id: "D001".to_string(),
            department,
            date_time: at(date_time),
            duration_minutes: 30,
            appointment_type: "Consultation".to_string(),
            notes: String::new(),
        }
    }

    fn sample_registry() -> AppointmentRegistry {
        let mut registry = AppointmentRegistry::new();
        registry
            .create(request("P001", Department::Cardiology, "2026-10-17 09:00"))
            .unwrap();
        registry
            .create(request("P002", Department::Emergency, "2026-10-17 23:59"))
            .unwrap();
        registry
            .create(request("P003", Department::Cardiology, "2026-10-18 08:30"))
            .unwrap();
        registry
    }

    #[test]
    fn test_create_is_scheduled() {
        let registry = sample_registry();
        let ids: Vec<&str> = registry.get_all().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A001", "A002", "A003"]);
        assert!(registry
            .get_all()
            .iter()
            .all(|a| a.status == AppointmentStatus::Scheduled));
    }

    #[test]
    fn test_request_defaults_duration() {
        let request: NewAppointment = serde_json::from_str(
            r#"{
                "patientId": "P001",
                "doctorId": "D001",
                "department": "Orthopedics",
                "dateTime": "2026-10-20T14:00:00",
                "type": "Consultation"
            }"#,
        )
        .unwrap();
        assert_eq!(request.duration_minutes, 30);
    }

    #[test]
    fn test_date_filters() {
        let registry = sample_registry();
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(registry.on_date(day).len(), 2);

        let range = registry.by_date_range(at("2026-10-17 09:00"), at("2026-10-18 08:30"));
        assert_eq!(range.len(), 3);
        let range = registry.by_date_range(at("2026-10-17 09:01"), at("2026-10-18 08:29"));
        assert_eq!(range.len(), 1);

        assert_eq!(registry.by_department(Department::Cardiology).len(), 2);
    }

    #[test]
    fn test_update_status_and_delete() {
        let mut registry = sample_registry();
        let updated = registry
            .update(
                "A002",
                AppointmentUpdate {
                    status: Some(AppointmentStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert_eq!(updated.patient_id, "P002");

        registry.delete("A001").unwrap();
        assert_eq!(registry.get_all().len(), 2);
        assert!(matches!(
            registry.update("A001", AppointmentUpdate::default()),
            Err(HospitalError::NotFound(_))
        ));
    }

    #[test]
    fn test_from_records_continues_sequence() {
        let records = sample_registry().get_all().to_vec();
        let mut registry = AppointmentRegistry::from_records(records);
        let created = registry
            .create(request("P004", Department::Obstetrics, "2026-10-19 10:00"))
            .unwrap();
        assert_eq!(created.id, "A004");
    }
}
