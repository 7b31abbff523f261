#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("patient data file not found: {}", .0.display())]
    SourceMissing(std::path::PathBuf),
    #[error("failed to read patient data file: {0}")]
    SourceRead(std::io::Error),
    #[error("failed to parse patient data: {0}")]
    SourceMalformed(serde_json::Error),
}

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;
