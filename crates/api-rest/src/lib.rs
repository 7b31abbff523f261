//! # API REST
//!
//! REST API implementation for the patient directory.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! The core query semantics live in `pd-core`; this crate only maps transport
//! parameters in and source failures out.

#![warn(rust_2018_idioms)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use pd_core::{
    execute, ContactInfo, DirectoryError, Pagination, PatientRecord, QueryRequest, RecordSource,
};

/// Application state for the REST API server
///
/// Contains shared state accessible to all request handlers, currently the
/// record source used to snapshot the dataset per query.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<RecordSource>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One page of patient records plus pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListPatientsRes {
    pub data: Vec<PatientRecord>,
    pub pagination: Pagination,
}

/// Error payload for failed requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_patients, preflight),
    components(schemas(
        HealthRes,
        ListPatientsRes,
        ErrorRes,
        PatientRecord,
        ContactInfo,
        Pagination
    ))
)]
struct ApiDoc;

/// Builds the application router with all routes, Swagger documentation, and
/// permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/data", get(list_patients).options(preflight))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the patient directory service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Patient directory API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/data",
    params(
        ("page" = Option<String>, Query, description = "Page number, minimum 1 (default 1)"),
        ("limit" = Option<String>, Query, description = "Page size, clamped to 1-100 (default 10)"),
        ("search" = Option<String>, Query, description = "Case-insensitive search over name, id, primary contact, and medical issue"),
        ("sortBy" = Option<String>, Query, description = "patient_name | age | patient_id | medical_issue"),
        ("sortOrder" = Option<String>, Query, description = "asc | desc"),
        ("medicalIssue" = Option<String>, Query, description = "Comma-separated medical issue labels"),
    ),
    responses(
        (status = 200, description = "One page of patient records", body = ListPatientsRes),
        (status = 404, description = "Dataset file not found", body = ErrorRes),
        (status = 500, description = "Dataset malformed or unreadable", body = ErrorRes)
    )
)]
/// Query the patient directory
///
/// Snapshots the backing dataset, then filters, sorts, and paginates it
/// according to the query parameters. Malformed paging or sort values are
/// coerced to defaults rather than rejected.
///
/// # Errors
/// Returns `404 Not Found` if the dataset file is missing, and
/// `500 Internal Server Error` if it cannot be read or parsed.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListPatientsRes>, (StatusCode, Json<ErrorRes>)> {
    let request = QueryRequest::from_params(&params);
    let records = state.source.snapshot().map_err(reject)?;
    let result = execute(records, &request);

    Ok(Json(ListPatientsRes {
        data: result.items,
        pagination: result.pagination,
    }))
}

#[utoipa::path(
    options,
    path = "/api/data",
    responses(
        (status = 200, description = "Preflight accepted, no body")
    )
)]
/// CORS preflight for the data endpoint
///
/// Responds with success and no body; the CORS layer attaches the
/// access-control headers.
#[axum::debug_handler]
async fn preflight(State(_state): State<AppState>) -> StatusCode {
    StatusCode::OK
}

/// Maps a source failure onto the response taxonomy: missing dataset is a
/// not-found condition, a malformed dataset and everything else are server
/// conditions.
fn reject(err: DirectoryError) -> (StatusCode, Json<ErrorRes>) {
    tracing::error!("Query patients error: {:?}", err);

    let (status, message) = match err {
        DirectoryError::SourceMissing(_) => (StatusCode::NOT_FOUND, "Data file not found"),
        DirectoryError::SourceMalformed(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid data format")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };

    (
        status,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use pd_core::CoreConfig;
    use std::io::Write;
    use std::path::Path;
    use tempfile::{NamedTempFile, TempDir};
    use tower::ServiceExt;

    const FIXTURE: &str = r#"[
        {"patient_id": 1, "patient_name": "Rhys Davies", "age": 58, "photo_url": null,
         "contact": [{"address": null, "number": "020 7946 0002", "email": "rhys@example.com"}],
         "medical_issue": "rash"},
        {"patient_id": 2, "patient_name": "Amelia Barker", "age": 34, "photo_url": null,
         "contact": [{"address": null, "number": "020 7555 0001", "email": "amelia@example.com"}],
         "medical_issue": "fever"},
        {"patient_id": 3, "patient_name": "Ben Okafor", "age": 41, "photo_url": null,
         "contact": [], "medical_issue": "fever"}
    ]"#;

    fn state_for(path: &Path) -> AppState {
        let cfg = Arc::new(CoreConfig::new(path.to_path_buf()).unwrap());
        AppState {
            source: Arc::new(RecordSource::new(cfg)),
        }
    }

    fn fixture_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{FIXTURE}").unwrap();
        file
    }

    async fn send_get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let file = fixture_file();
        let response = send_get(router(state_for(file.path())), "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_data_returns_sorted_page_with_pagination() {
        let file = fixture_file();
        let response = send_get(router(state_for(file.path())), "/api/data").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        // Default sort: patient_name ascending.
        assert_eq!(data[0]["patient_name"], "Amelia Barker");
        assert_eq!(data[1]["patient_name"], "Ben Okafor");
        assert_eq!(data[2]["patient_name"], "Rhys Davies");

        assert_eq!(json["pagination"]["currentPage"], 1);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["pagination"]["totalItems"], 3);
        assert_eq!(json["pagination"]["itemsPerPage"], 10);
        assert_eq!(json["pagination"]["hasNextPage"], false);
        assert_eq!(json["pagination"]["hasPrevPage"], false);
        assert_eq!(json["pagination"]["nextPage"], serde_json::Value::Null);
        assert_eq!(json["pagination"]["prevPage"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_data_applies_filters_and_paging() {
        let file = fixture_file();
        let app = router(state_for(file.path()));
        let response = send_get(app, "/api/data?medicalIssue=Fever&limit=1&page=2").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["patient_name"], "Ben Okafor");
        assert_eq!(json["pagination"]["totalItems"], 2);
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["prevPage"], 1);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = router(state_for(&dir.path().join("absent.json")));
        let response = send_get(app, "/api/data").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Data file not found");
    }

    #[tokio::test]
    async fn test_malformed_dataset_is_server_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"a sequence\"}}").unwrap();
        let response = send_get(router(state_for(file.path())), "/api/data").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid data format");
    }

    #[tokio::test]
    async fn test_options_returns_ok_with_empty_body() {
        let file = fixture_file();
        let app = router(state_for(file.path()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_responses_allow_any_origin() {
        let file = fixture_file();
        let app = router(state_for(file.path()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/data")
                    .header(header::ORIGIN, "https://directory.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
