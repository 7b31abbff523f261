//! The patient query pipeline.
//!
//! One centralised coercion step turns untrusted string parameters into a
//! typed [`QueryRequest`]; [`execute`] then runs search filter, category
//! filter, stable sort, and pagination over an in-memory snapshot of patient
//! records. The pipeline is a pure function of its inputs: no I/O, no side
//! effects, deterministic for a given snapshot and request.
//!
//! Malformed parameters never fail a query. Non-numeric paging values fall
//! back to their defaults before clamping, and unknown sort values fall back
//! to sorting by name ascending.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::patient::PatientRecord;

/// Page number used when the transport value is missing or malformed.
const DEFAULT_PAGE: u32 = 1;
/// Page size used when the transport value is missing or malformed.
const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound on the number of records returned per page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Record field a query can sort on.
///
/// A closed set: unknown transport values fall back to [`SortField::Name`]
/// during coercion, so comparator dispatch stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Age,
    Id,
    MedicalIssue,
}

impl SortField {
    /// Parses the `sortBy` transport value.
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("age") => Self::Age,
            Some("patient_id") => Self::Id,
            Some("medical_issue") => Self::MedicalIssue,
            _ => Self::Name,
        }
    }
}

/// Direction of the sort stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses the `sortOrder` transport value.
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// A validated query over the patient collection.
///
/// Construct with [`QueryRequest::from_params`] to apply the coercion and
/// clamping rules to untrusted transport parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// 1-based page number, always ≥ 1.
    pub page: u32,
    /// Records per page, always in `[1, MAX_PAGE_SIZE]`.
    pub page_size: usize,
    /// Lowercased search text; `None` when the raw value was empty or absent.
    pub search: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Lowercased category labels; `None` when no usable label was supplied.
    pub categories: Option<HashSet<String>>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            categories: None,
        }
    }
}

impl QueryRequest {
    /// Builds a request from a flat map of transport parameters.
    ///
    /// Recognised keys are `page`, `limit`, `search`, `sortBy`, `sortOrder`,
    /// and `medicalIssue` (a comma-separated label list). Values that fail to
    /// parse are coerced to their defaults rather than rejected, and paging
    /// values are clamped into range.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(i64::from(DEFAULT_PAGE))
            .clamp(1, i64::from(u32::MAX)) as u32;

        let page_size = params
            .get("limit")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as usize;

        let search = params
            .get("search")
            .map(|v| v.to_lowercase())
            .filter(|v| !v.is_empty());

        let categories = params
            .get("medicalIssue")
            .map(|raw| {
                raw.to_lowercase()
                    .split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_owned)
                    .collect::<HashSet<_>>()
            })
            .filter(|labels| !labels.is_empty());

        Self {
            page,
            page_size,
            search,
            sort_field: SortField::from_param(params.get("sortBy").map(String::as_str)),
            sort_direction: SortDirection::from_param(params.get("sortOrder").map(String::as_str)),
            categories,
        }
    }
}

/// Pagination metadata describing one page of a filtered collection.
///
/// Wire names are camelCase, matching the response payload consumed by the
/// directory UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: usize,
    /// Count after filtering, before pagination slicing.
    pub total_items: usize,
    pub items_per_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

/// One page of records plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub items: Vec<PatientRecord>,
    pub pagination: Pagination,
}

/// Runs the full pipeline over a snapshot of the record collection.
///
/// Stages: search filter, category filter (both optional, composed with AND),
/// stable sort on the requested field, then pagination. Requesting a page
/// past the end yields an empty page with correct metadata, mirroring a
/// slice past the end of a sequence rather than an error.
pub fn execute(records: Vec<PatientRecord>, request: &QueryRequest) -> QueryResult {
    let mut matched = records;

    if let Some(needle) = &request.search {
        matched.retain(|record| matches_search(record, needle));
    }

    if let Some(categories) = &request.categories {
        matched.retain(|record| categories.contains(&record.medical_issue.as_str().to_lowercase()));
    }

    // Vec::sort_by is stable, so equal keys keep their relative input order.
    matched.sort_by(|a, b| {
        let ordering = compare_by(a, b, request.sort_field);
        match request.sort_direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let total_items = matched.len();
    let total_pages = total_items.div_ceil(request.page_size);
    let start = (request.page as usize - 1).saturating_mul(request.page_size);

    let items: Vec<PatientRecord> = matched
        .into_iter()
        .skip(start)
        .take(request.page_size)
        .collect();

    let has_next_page = (request.page as usize) < total_pages;
    let has_prev_page = request.page > 1;

    QueryResult {
        items,
        pagination: Pagination {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.page_size,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| request.page + 1),
            prev_page: has_prev_page.then(|| request.page - 1),
        },
    }
}

/// Case-insensitive substring match over name, stringified id, primary
/// contact, and medical issue. The phone number is matched raw, not
/// case-folded. A record without contacts can still match on the other
/// fields.
fn matches_search(record: &PatientRecord, needle: &str) -> bool {
    if record.name.as_str().to_lowercase().contains(needle)
        || record.id.to_string().contains(needle)
        || record.medical_issue.as_str().to_lowercase().contains(needle)
    {
        return true;
    }

    record.primary_contact().is_some_and(|contact| {
        contact
            .phone_number
            .as_deref()
            .is_some_and(|number| number.contains(needle))
            || contact
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(needle))
    })
}

fn compare_by(a: &PatientRecord, b: &PatientRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => a
            .name
            .as_str()
            .to_lowercase()
            .cmp(&b.name.as_str().to_lowercase()),
        SortField::Age => a.age.cmp(&b.age),
        SortField::Id => a.id.cmp(&b.id),
        SortField::MedicalIssue => a
            .medical_issue
            .as_str()
            .to_lowercase()
            .cmp(&b.medical_issue.as_str().to_lowercase()),
    }
}
