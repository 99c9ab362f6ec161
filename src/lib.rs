//! # 医院急诊分诊
//!
//! 汇总各子模块的常用类型，供演示程序和外部调用方使用。

pub use hospital_core::{
    Appointment, AppointmentStatus, Bed, BedStatus, Department, HospitalError, Patient,
    PatientStatus, Result, Shift, Staff, StaffRole, TriagePriority, Ward,
};
pub use hospital_records::{
    AppointmentRegistry, BedRegistry, DepartmentSummary, HospitalSummary, NewAppointment,
    NewBed, NewPatient, NewStaff, PatientRegistry, PatientUpdate, StaffRegistry,
};
pub use hospital_triage::{
    build_queue, set_priority, AssignmentPolicy, EmergencyAdmission, EmergencyBoard,
    EmergencyOverview, RecordedPolicy, SimulatedPolicy, TriagePatient, TriageQueue, TriageStats,
};
