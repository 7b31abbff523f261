//! # PD Core
//!
//! Core business logic for the patient directory service.
//!
//! This crate contains pure data operations:
//! - The patient record model and its dataset wire format
//! - The record source that snapshots the backing dataset per query
//! - The query pipeline (search, category filter, stable sort, pagination)
//!
//! **No API concerns**: HTTP servers, CORS, and OpenAPI documentation belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod query;
pub mod source;

pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_FILE;
pub use error::{DirectoryError, DirectoryResult};
pub use patient::{ContactInfo, PatientRecord};
pub use query::{execute, Pagination, QueryRequest, QueryResult, SortDirection, SortField};
pub use source::RecordSource;
