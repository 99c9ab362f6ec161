//! 记录来源
//!
//! 仪表盘加载时一次性读取全部记录，本地实现为JSON文件。

use async_trait::async_trait;
use hospital_core::{Appointment, Bed, Patient, Result, Staff};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// 记录来源接口
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 来源名称（用于日志）
    fn name(&self) -> &str;

    /// 读取全部患者
    async fn load_patients(&self) -> Result<Vec<Patient>>;

    /// 读取全部床位
    async fn load_beds(&self) -> Result<Vec<Bed>>;

    /// 读取人员名册，来源不提供时为空
    async fn load_staff(&self) -> Result<Vec<Staff>> {
        Ok(Vec::new())
    }

    /// 读取预约，来源不提供时为空
    async fn load_appointments(&self) -> Result<Vec<Appointment>> {
        Ok(Vec::new())
    }
}

/// 一次加载得到的全部记录
#[derive(Debug, Clone, Default)]
pub struct HospitalRecords {
    pub patients: Vec<Patient>,
    pub beds: Vec<Bed>,
    pub staff: Vec<Staff>,
    pub appointments: Vec<Appointment>,
}

/// JSON文件记录来源
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    patients_path: PathBuf,
    beds_path: PathBuf,
    staff_path: Option<PathBuf>,
    appointments_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(patients_path: impl Into<PathBuf>, beds_path: impl Into<PathBuf>) -> Self {
        Self {
            patients_path: patients_path.into(),
            beds_path: beds_path.into(),
            staff_path: None,
            appointments_path: None,
        }
    }

    /// 同时读取人员名册
    pub fn with_staff(mut self, path: impl Into<PathBuf>) -> Self {
        self.staff_path = Some(path.into());
        self
    }

    /// 同时读取预约
    pub fn with_appointments(mut self, path: impl Into<PathBuf>) -> Self {
        self.appointments_path = Some(path.into());
        self
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .inspect_err(|e| tracing::error!("Failed to read {}: {}", path.display(), e))?;
        let records: Vec<T> = serde_json::from_str(&content)?;
        tracing::debug!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    async fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
        match path {
            Some(path) => Self::read_json(path).await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load_patients(&self) -> Result<Vec<Patient>> {
        Self::read_json(&self.patients_path).await
    }

    async fn load_beds(&self) -> Result<Vec<Bed>> {
        Self::read_json(&self.beds_path).await
    }

    async fn load_staff(&self) -> Result<Vec<Staff>> {
        Self::read_optional(self.staff_path.as_deref()).await
    }

    async fn load_appointments(&self) -> Result<Vec<Appointment>> {
        Self::read_optional(self.appointments_path.as_deref()).await
    }
}

/// 并发读取全部记录
pub async fn load_all(source: &dyn RecordSource) -> Result<HospitalRecords> {
    let (patients, beds, staff, appointments) = tokio::try_join!(
        source.load_patients(),
        source.load_beds(),
        source.load_staff(),
        source.load_appointments()
    )?;
    tracing::info!(
        "Loaded {} patients, {} beds, {} staff and {} appointments from {}",
        patients.len(),
        beds.len(),
        staff.len(),
        appointments.len(),
        source.name()
    );
    Ok(HospitalRecords {
        patients,
        beds,
        staff,
        appointments,
    })
}
