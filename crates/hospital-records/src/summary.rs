//! 全院概览与科室统计

use chrono::NaiveDate;
use hospital_core::{BedStatus, Department, PatientStatus, Shift, StaffRole};
use serde::{Deserialize, Serialize};

use crate::appointments::AppointmentRegistry;
use crate::beds::BedRegistry;
use crate::patients::PatientRegistry;
use crate::staff::StaffRegistry;

/// 全院概览
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalSummary {
    pub total_patients: usize,
    pub critical_patients: usize,
    pub total_beds: usize,
    pub occupied_beds: usize,
    pub available_beds: usize,
    /// 床位占用率（百分比，四舍五入），无床位时为0
    pub bed_occupancy_percent: u32,
    pub todays_appointments: usize,
}

impl HospitalSummary {
    pub fn compute(
        patients: &PatientRegistry,
        beds: &BedRegistry,
        appointments: &AppointmentRegistry,
        today: NaiveDate,
    ) -> Self {
        let total_beds = beds.get_all().len();
        let occupied_beds = beds.occupied().len();

        Self {
            total_patients: patients.len(),
            critical_patients: patients.by_status(PatientStatus::Critical).len(),
            total_beds,
            occupied_beds,
            available_beds: beds.available().len(),
            bed_occupancy_percent: percent(occupied_beds, total_beds),
            todays_appointments: appointments.on_date(today).len(),
        }
    }
}

/// 科室统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub department: Department,
    pub total_staff: usize,
    pub doctors: usize,
    pub nurses: usize,
    /// 白班人数
    pub on_duty: usize,
    pub total_beds: usize,
    pub occupied_beds: usize,
    pub available_beds: usize,
    pub occupancy_percent: u32,
}

impl DepartmentSummary {
    /// 按 [`Department::ALL`] 顺序统计每个科室
    pub fn compute_all(staff: &StaffRegistry, beds: &BedRegistry) -> Vec<Self> {
        Department::ALL
            .iter()
            .map(|&department| Self::compute(department, staff, beds))
            .collect()
    }

    pub fn compute(department: Department, staff: &StaffRegistry, beds: &BedRegistry) -> Self {
        let members = staff.by_department(department);
        let count_role = |role: StaffRole| members.iter().filter(|s| s.role == role).count();

        let ward_beds = department.ward().map(|ward| beds.by_ward(ward)).unwrap_or_default();
        let count_beds = |status: BedStatus| ward_beds.iter().filter(|b| b.status == status).count();
        let total_beds = ward_beds.len();
        let occupied_beds = count_beds(BedStatus::Occupied);

        Self {
            department,
            total_staff: members.len(),
            doctors: count_role(StaffRole::Doctor),
            nurses: count_role(StaffRole::Nurse),
            on_duty: members.iter().filter(|s| s.shift == Shift::Day).count(),
            total_beds,
            occupied_beds,
            available_beds: count_beds(BedStatus::Available),
            occupancy_percent: percent(occupied_beds, total_beds),
        }
    }
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}
