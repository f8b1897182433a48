//! Data categories, share metadata, and typed record views.
//!
//! Record views are derived fresh from each read and never mutated
//! client-side; share status transitions happen entirely on the ledger.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Fixed partition of health data. Each category binds a unique versioned
/// domain-separation string; changing one silently changes every key
/// derived under it, so any change must bump the version suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    PersonalInfo,
    MedicationRecords,
    VaccinationRecords,
    MedicalReports,
    AllData,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::PersonalInfo,
        Category::MedicationRecords,
        Category::VaccinationRecords,
        Category::MedicalReports,
        Category::AllData,
    ];

    /// HKDF info string for this category's key.
    pub fn domain_string(&self) -> &'static str {
        match self {
            Category::PersonalInfo => "healthvault/category/personal-info-v1",
            Category::MedicationRecords => "healthvault/category/medication-records-v1",
            Category::VaccinationRecords => "healthvault/category/vaccination-records-v1",
            Category::MedicalReports => "healthvault/category/medical-reports-v1",
            Category::AllData => "healthvault/category/all-data-v1",
        }
    }

    /// On-chain ordinal for this category.
    pub fn ordinal(&self) -> u8 {
        match self {
            Category::PersonalInfo => 0,
            Category::MedicationRecords => 1,
            Category::VaccinationRecords => 2,
            Category::MedicalReports => 3,
            Category::AllData => 4,
        }
    }

    /// Total mapping from an on-chain ordinal. Unrecognized ordinals fall
    /// back to `AllData` so contract upgrades that add categories do not
    /// break older clients; the client never enforces access itself, so the
    /// fallback is display-only.
    pub fn from_ordinal(raw: u8) -> Category {
        match raw {
            0 => Category::PersonalInfo,
            1 => Category::MedicationRecords,
            2 => Category::VaccinationRecords,
            3 => Category::MedicalReports,
            _ => Category::AllData,
        }
    }
}

/// Level of access granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    View,
    Manage,
    /// Ordinal this client does not know. Preserved, never an error.
    Unknown(u8),
}

impl AccessLevel {
    pub fn from_ordinal(raw: u8) -> AccessLevel {
        match raw {
            0 => AccessLevel::View,
            1 => AccessLevel::Manage,
            other => AccessLevel::Unknown(other),
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            AccessLevel::View => 0,
            AccessLevel::Manage => 1,
            AccessLevel::Unknown(raw) => *raw,
        }
    }
}

/// Ledger-side share status. The client only observes these transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareStatus {
    Active,
    Expired,
    Revoked,
    /// Ordinal this client does not know. Preserved, never an error.
    Unknown(u8),
}

impl ShareStatus {
    pub fn from_ordinal(raw: u8) -> ShareStatus {
        match raw {
            0 => ShareStatus::Active,
            1 => ShareStatus::Expired,
            2 => ShareStatus::Revoked,
            other => ShareStatus::Unknown(other),
        }
    }
}

/// Personal-info reference. Hashes point into content-addressed storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfoRecord {
    pub owner: Address,
    pub full_name_hash: String,
    pub demographics_hash: String,
    pub updated_at: u64,
}

/// One medication entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: u64,
    pub owner: Address,
    pub content_hash: String,
    pub prescriber: String,
    pub added_at: u64,
}

/// One vaccination entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub id: u64,
    pub owner: Address,
    pub content_hash: String,
    pub administered_at: u64,
}

/// One medical report entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: u64,
    pub owner: Address,
    pub content_hash: String,
    pub report_type: String,
    pub created_at: u64,
}

/// A grant of one category's data to a named recipient, carrying the
/// category key re-wrapped for that recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRecord {
    pub recipient: Address,
    pub category: Category,
    pub access: AccessLevel,
    pub status: ShareStatus,
    pub expires_at: u64,
    /// Base64 IV-plus-ciphertext envelope, opened with
    /// [`crate::keys::exchange::unwrap_category_key`].
    pub wrapped_key: String,
}
