//! Patient directory REST API server binary.
//!
//! Serves the read-only query endpoint over the configured dataset file, with
//! Swagger UI at `/swagger-ui` and permissive CORS.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use pd_core::{CoreConfig, RecordSource, DEFAULT_PATIENT_DATA_FILE};

/// Main entry point for the patient directory REST API server
///
/// Starts the REST API server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `PD_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_FILE`: Path to the patient dataset (default: "data/patients.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid, or
/// - the server address cannot be bound or the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_file = std::env::var("PATIENT_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATIENT_DATA_FILE));

    tracing::info!("++ Starting patient directory REST API on {}", addr);
    tracing::info!("++ Serving dataset {}", data_file.display());

    if !data_file.is_file() {
        // Not fatal: the endpoint reports a missing dataset per request.
        tracing::warn!("patient data file {} does not exist yet", data_file.display());
    }

    let cfg = Arc::new(CoreConfig::new(data_file)?);
    let state = AppState {
        source: Arc::new(RecordSource::new(cfg)),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
