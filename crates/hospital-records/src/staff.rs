//! 医护人员名册
//!
//! 编号共用一个序列，前缀随岗位变化（医生 D，护士 N，其余 A）。

use hospital_core::utils::RecordSequence;
use hospital_core::{Department, HospitalError, Result, Shift, Staff, StaffRole};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 新增人员请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub role: StaffRole,
    pub department: Department,
    pub specialization: Option<String>,
    pub shift: Shift,
    #[serde(default)]
    pub contact: String,
    pub email: Option<String>,
}

/// 人员更新请求，未设置的字段保持不变；岗位变化不改编号
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub role: Option<StaffRole>,
    pub department: Option<Department>,
    pub specialization: Option<String>,
    pub shift: Option<Shift>,
    pub contact: Option<String>,
    pub email: Option<String>,
}

/// 人员名册
#[derive(Debug, Default)]
pub struct StaffRegistry {
    staff: Vec<Staff>,
    sequence: RecordSequence,
}

impl StaffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有记录构建，重复编号只保留首条
    pub fn from_records(records: Vec<Staff>) -> Self {
        let mut registry = Self::new();
        let mut seen = HashSet::with_capacity(records.len());
        for member in records {
            if !seen.insert(member.id.clone()) {
                tracing::warn!("Skipping duplicate staff record {}", member.id);
                continue;
            }
            registry.sequence.observe(&member.id);
            registry.staff.push(member);
        }
        tracing::debug!("Loaded {} staff records", registry.staff.len());
        registry
    }

    pub fn get_all(&self) -> &[Staff] {
        &self.staff
    }

    pub fn get(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    /// 新增人员
    pub fn create(&mut self, request: NewStaff) -> Result<Staff> {
        if request.name.trim().is_empty() {
            return Err(HospitalError::Validation("Staff name cannot be empty".to_string()));
        }

        let member = Staff {
            id: self.sequence.next_code(request.role.code_prefix())?,
            name: request.name,
            role: request.role,
            department: request.department,
            specialization: request.specialization,
            shift: request.shift,
            contact: request.contact,
            email: request.email,
        };

        tracing::info!("Added staff member {} ({:?}, {})", member.id, member.role, member.department);
        self.staff.push(member.clone());
        Ok(member)
    }

    pub fn update(&mut self, id: &str, update: StaffUpdate) -> Result<Staff> {
        let member = self
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Staff member {} not found", id)))?;

        if let Some(name) = update.name {
            member.name = name;
        }
        if let Some(role) = update.role {
            member.role = role;
        }
        if let Some(department) = update.department {
            member.department = department;
        }
        if let Some(specialization) = update.specialization {
            member.specialization = Some(specialization);
        }
        if let Some(shift) = update.shift {
            member.shift = shift;
        }
        if let Some(contact) = update.contact {
            member.contact = contact;
        }
        if let Some(email) = update.email {
            member.email = Some(email);
        }

        tracing::info!("Updated staff member {}", id);
        Ok(member.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<Staff> {
        let index = self
            .staff
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| HospitalError::NotFound(format!("Staff member {} not found", id)))?;

        let removed = self.staff.remove(index);
        tracing::info!("Removed staff member {}", id);
        Ok(removed)
    }

    pub fn by_department(&self, department: Department) -> Vec<&Staff> {
        self.staff.iter().filter(|s| s.department == department).collect()
    }

    pub fn by_role(&self, role: StaffRole) -> Vec<&Staff> {
        self.staff.iter().filter(|s| s.role == role).collect()
    }

    pub fn by_shift(&self, shift: Shift) -> Vec<&Staff> {
        self.staff.iter().filter(|s| s.shift == shift).collect()
    }
}
