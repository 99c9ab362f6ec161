//! 床位登记表
//!
//! 床位分配只做“首个空闲床位”，不做任何优化。

use chrono::Utc;
use hospital_core::utils::RecordSequence;
use hospital_core::{Bed, BedStatus, HospitalError, Result, Ward};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 病区床位占用统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardOccupancy {
    pub ward: Ward,
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub maintenance: usize,
    pub occupancy_percent: u32,
}

/// 新建床位请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBed {
    pub number: String,
    pub ward: Ward,
    #[serde(default = "default_bed_status")]
    pub status: BedStatus,
}

fn default_bed_status() -> BedStatus {
    BedStatus::Available
}

/// 床位更新请求，未设置的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedUpdate {
    pub number: Option<String>,
    pub ward: Option<Ward>,
    pub status: Option<BedStatus>,
}

/// 床位登记表
#[derive(Debug)]
pub struct BedRegistry {
    beds: Vec<Bed>,
    sequence: RecordSequence,
}

impl BedRegistry {
    pub fn new() -> Self {
        Self {
            beds: Vec::new(),
            sequence: RecordSequence::new(),
        }
    }

    /// 从已有记录构建
    pub fn from_records(records: Vec<Bed>) -> Self {
        let mut registry = Self::new();
        let mut seen = HashSet::with_capacity(records.len());
        for bed in records {
            if !seen.insert(bed.id.clone()) {
                tracing::warn!("Skipping duplicate bed record {}", bed.id);
                continue;
            }
            registry.sequence.observe(&bed.id);
            registry.beds.push(bed);
        }
        tracing::debug!("Loaded {} bed records", registry.beds.len());
        registry
    }

    /// 新建床位，记录清洁时间
    pub fn create(&mut self, request: NewBed) -> Result<Bed> {
        if request.number.trim().is_empty() {
            return Err(HospitalError::Validation("Bed number cannot be empty".to_string()));
        }

        let bed = Bed {
            id: self.sequence.next_code('B')?,
            number: request.number,
            ward: request.ward,
            status: request.status,
            patient_id: None,
            last_cleaned: Some(Utc::now()),
        };

        tracing::info!("Created bed {} ({}) in {}", bed.id, bed.number, bed.ward);
        self.beds.push(bed.clone());
        Ok(bed)
    }

    /// 更新床位属性，占用关系通过 [`assign_patient`](Self::assign_patient) 和
    /// [`release_patient`](Self::release_patient) 修改
    pub fn update(&mut self, bed_id: &str, update: BedUpdate) -> Result<Bed> {
        let bed = self.bed_mut(bed_id)?;

        if let Some(number) = update.number {
            bed.number = number;
        }
        if let Some(ward) = update.ward {
            bed.ward = ward;
        }
        if let Some(status) = update.status {
            bed.status = status;
            if status != BedStatus::Occupied {
                bed.patient_id = None;
            }
        }

        tracing::info!("Updated bed {}", bed_id);
        Ok(bed.clone())
    }

    /// 删除床位
    pub fn delete(&mut self, bed_id: &str) -> Result<Bed> {
        let index = self
            .beds
            .iter()
            .position(|b| b.id == bed_id)
            .ok_or_else(|| HospitalError::NotFound(format!("Bed {} not found", bed_id)))?;

        let removed = self.beds.remove(index);
        tracing::info!("Removed bed {}", bed_id);
        Ok(removed)
    }

    pub fn get_all(&self) -> &[Bed] {
        &self.beds
    }

    pub fn get(&self, id: &str) -> Option<&Bed> {
        self.beds.iter().find(|b| b.id == id)
    }

    pub fn by_ward(&self, ward: Ward) -> Vec<&Bed> {
        self.beds.iter().filter(|b| b.ward == ward).collect()
    }

    pub fn available(&self) -> Vec<&Bed> {
        self.with_status(BedStatus::Available)
    }

    pub fn occupied(&self) -> Vec<&Bed> {
        self.with_status(BedStatus::Occupied)
    }

    fn with_status(&self, status: BedStatus) -> Vec<&Bed> {
        self.beds.iter().filter(|b| b.status == status).collect()
    }

    /// 病区内首个空闲床位
    pub fn first_available(&self, ward: Ward) -> Option<&Bed> {
        self.beds
            .iter()
            .find(|b| b.ward == ward && b.status == BedStatus::Available)
    }

    /// 将患者分配到床位
    pub fn assign_patient(&mut self, bed_id: &str, patient_id: &str) -> Result<Bed> {
        let bed = self.bed_mut(bed_id)?;

        if bed.status != BedStatus::Available {
            return Err(HospitalError::Validation(format!(
                "Bed {} is {:?} and cannot take a patient",
                bed_id, bed.status
            )));
        }

        bed.status = BedStatus::Occupied;
        bed.patient_id = Some(patient_id.to_string());

        tracing::info!("Assigned patient {} to bed {} ({})", patient_id, bed.number, bed.ward);
        Ok(bed.clone())
    }

    /// 释放床位，记录清洁时间
    pub fn release_patient(&mut self, bed_id: &str) -> Result<Bed> {
        let bed = self.bed_mut(bed_id)?;
        let previous = bed.patient_id.take();

        bed.status = BedStatus::Available;
        bed.last_cleaned = Some(Utc::now());

        tracing::info!("Released bed {} (patient {:?})", bed.number, previous);
        Ok(bed.clone())
    }

    /// 各病区床位占用统计
    pub fn ward_occupancy(&self) -> Vec<WardOccupancy> {
        Ward::ALL
            .iter()
            .map(|&ward| {
                let ward_beds = self.by_ward(ward);
                let count = |status: BedStatus| ward_beds.iter().filter(|b| b.status == status).count();
                let total = ward_beds.len();
                let occupied = count(BedStatus::Occupied);
                let occupancy_percent = if total > 0 {
                    ((occupied as f64 / total as f64) * 100.0).round() as u32
                } else {
                    0
                };

                WardOccupancy {
                    ward,
                    total,
                    occupied,
                    available: count(BedStatus::Available),
                    maintenance: count(BedStatus::Maintenance),
                    occupancy_percent,
                }
            })
            .collect()
    }

    fn bed_mut(&mut self, bed_id: &str) -> Result<&mut Bed> {
        self.beds
            .iter_mut()
            .find(|b| b.id == bed_id)
            .ok_or_else(|| HospitalError::NotFound(format!("Bed {} not found", bed_id)))
    }
}

impl Default for BedRegistry {
    fn default() -> Self {
        Self::new()
    }
}
