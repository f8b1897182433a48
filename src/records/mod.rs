//! On-chain record views and the semantic contract facade.

pub mod contract;
pub mod types;

pub use contract::HealthVault;
pub use types::{
    AccessLevel, Category, MedicalReport, MedicationRecord, PersonalInfoRecord, ShareRecord,
    ShareStatus, VaccinationRecord,
};
