//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::error::{DirectoryError, DirectoryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The dataset file is not required to exist yet; its absence is reported
    /// per request by the record source.
    pub fn new(patient_data_file: PathBuf) -> DirectoryResult<Self> {
        if patient_data_file.as_os_str().is_empty() {
            return Err(DirectoryError::InvalidConfig(
                "patient data file path cannot be empty".into(),
            ));
        }

        Ok(Self { patient_data_file })
    }

    pub fn patient_data_file(&self) -> &Path {
        &self.patient_data_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_data_file_path() {
        let cfg = CoreConfig::new(PathBuf::from("data/patients.json")).unwrap();
        assert_eq!(cfg.patient_data_file(), Path::new("data/patients.json"));
    }

    #[test]
    fn test_new_rejects_empty_path() {
        let result = CoreConfig::new(PathBuf::new());
        assert!(matches!(result, Err(DirectoryError::InvalidConfig(_))));
    }
}
