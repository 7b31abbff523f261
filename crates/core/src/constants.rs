//! Shared constants for the patient directory core.

/// Default location of the patient dataset file, relative to the working
/// directory, used when `PATIENT_DATA_FILE` is not set.
pub const DEFAULT_PATIENT_DATA_FILE: &str = "data/patients.json";
