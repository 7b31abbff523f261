//! The patient record model.
//!
//! Field renames pin the wire format of the backing dataset, which uses
//! `patient_id`/`patient_name` style keys and calls the contact sequence
//! `contact`. Records are treated as read-only for the duration of a query.

use pd_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One patient directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    /// Positive integer, unique within the collection.
    #[serde(rename = "patient_id")]
    pub id: u64,
    #[serde(rename = "patient_name")]
    #[schema(value_type = String)]
    pub name: NonEmptyText,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Ordered contact sequence; may be empty.
    #[serde(rename = "contact", default)]
    pub contacts: Vec<ContactInfo>,
    /// Free-form category label, e.g. "fever" or "sore throat".
    #[serde(rename = "medical_issue")]
    #[schema(value_type = String)]
    pub medical_issue: NonEmptyText,
}

impl PatientRecord {
    /// The first contact in the sequence, the primary contact by convention.
    pub fn primary_contact(&self) -> Option<&ContactInfo> {
        self.contacts.first()
    }
}

/// Contact details for a patient. Every field is optional, so "no contact
/// present" and "contact present with missing fields" are distinct states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "number", default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
