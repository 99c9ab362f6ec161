//! # 医院记录模块
//!
//! 患者、床位、人员和预约的内存登记表，全院与科室统计，
//! 以及从外部来源加载记录的接口。

pub mod appointments;
pub mod beds;
pub mod patients;
pub mod source;
pub mod staff;
pub mod summary;

// 重新导出主要类型
pub use appointments::{AppointmentRegistry, AppointmentUpdate, NewAppointment};
pub use beds::{BedRegistry, BedUpdate, NewBed, WardOccupancy};
pub use patients::{NewPatient, PatientRegistry, PatientUpdate};
pub use source::{load_all, HospitalRecords, JsonFileSource, RecordSource};
pub use staff::{NewStaff, StaffRegistry, StaffUpdate};
pub use summary::{DepartmentSummary, HospitalSummary};
