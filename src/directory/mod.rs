//! # Directory Module
//!
//! Profile and reference records around the clinical workflow:
//! doctor/nurse/patient profiles tied to user accounts, departments
//! with soft delete, doctor availability slots and hospital-wide
//! configuration.

pub mod availability;
pub mod departments;
pub mod doctors;
pub mod errors;
pub mod hospital_config;
pub mod nurses;
pub mod patients;

pub use availability::{AvailabilityService, AvailabilitySlot, DayOfWeek};
pub use departments::{Department, DepartmentService};
pub use doctors::{DoctorProfile, DoctorService};
pub use errors::{DirectoryError, DirectoryResult};
pub use hospital_config::{HospitalConfig, HospitalConfigService};
pub use nurses::{NurseProfile, NurseService};
pub use patients::{PatientProfile, PatientService};
