//! Read-only access to the backing patient dataset.

use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::patient::PatientRecord;

/// Loads the patient collection from the configured dataset file.
///
/// Each call to [`RecordSource::snapshot`] re-reads the file and hands the
/// caller an owned snapshot that stays immutable for the duration of one
/// query; concurrent queries never share record storage.
#[derive(Clone, Debug)]
pub struct RecordSource {
    cfg: Arc<CoreConfig>,
}

impl RecordSource {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Reads and parses the full record collection.
    ///
    /// # Errors
    /// - [`DirectoryError::SourceMissing`] if the dataset file does not exist
    /// - [`DirectoryError::SourceRead`] if it exists but cannot be read
    /// - [`DirectoryError::SourceMalformed`] if the contents fail to parse as
    ///   a JSON sequence of patient records
    pub fn snapshot(&self) -> DirectoryResult<Vec<PatientRecord>> {
        let path = self.cfg.patient_data_file();

        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DirectoryError::SourceMissing(path.to_path_buf()),
            _ => DirectoryError::SourceRead(e),
        })?;

        let records: Vec<PatientRecord> =
            serde_json::from_str(&contents).map_err(DirectoryError::SourceMalformed)?;

        tracing::debug!(
            "loaded {} patient records from {}",
            records.len(),
            path.display()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn source_for(path: &std::path::Path) -> RecordSource {
        let cfg = Arc::new(CoreConfig::new(path.to_path_buf()).unwrap());
        RecordSource::new(cfg)
    }

    #[test]
    fn test_snapshot_reads_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"patient_id": 1, "patient_name": "Amelia Barker", "age": 34, "photo_url": null,
                  "contact": [{{"address": null, "number": "020 7946 0001", "email": null}}],
                  "medical_issue": "fever"}},
                {{"patient_id": 2, "patient_name": "Rhys Davies", "age": 58, "photo_url": null,
                  "contact": [], "medical_issue": "rash"}}
            ]"#
        )
        .unwrap();

        let records = source_for(file.path()).snapshot().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_str(), "Amelia Barker");
        assert!(records[1].primary_contact().is_none());
    }

    #[test]
    fn test_snapshot_missing_file_is_source_missing() {
        let dir = TempDir::new().unwrap();
        let result = source_for(&dir.path().join("absent.json")).snapshot();
        assert!(matches!(result, Err(DirectoryError::SourceMissing(_))));
    }

    #[test]
    fn test_snapshot_invalid_json_is_source_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        let result = source_for(file.path()).snapshot();
        assert!(matches!(result, Err(DirectoryError::SourceMalformed(_))));
    }

    #[test]
    fn test_snapshot_non_sequence_is_source_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"patients": []}}"#).unwrap();
        let result = source_for(file.path()).snapshot();
        assert!(matches!(result, Err(DirectoryError::SourceMalformed(_))));
    }

    #[test]
    fn test_snapshot_empty_sequence_is_ok() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let records = source_for(file.path()).snapshot().unwrap();
        assert!(records.is_empty());
    }
}
