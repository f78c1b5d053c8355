use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, app};
use pms_core::{CoreConfig, JsonFileStore, config::patient_data_file_from_env_value};

/// Main entry point for the patient management server
///
/// Resolves configuration once, then serves the REST API (with Swagger UI at `/swagger-ui`)
/// until interrupted.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `PATIENT_DATA_FILE`: JSON file holding all patients (default: "patients.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the patient data file's directory does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_run=info".parse()?)
                .add_directive("pms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let patient_data_file =
        patient_data_file_from_env_value(std::env::var("PATIENT_DATA_FILE").ok());
    let cfg = CoreConfig::new(patient_data_file)?;

    tracing::info!("++ Patient data file: {}", cfg.patient_data_file().display());
    tracing::info!("++ Starting Patients Management REST API on {}", rest_addr);

    let state = AppState::new(JsonFileStore::new(cfg.patient_data_file()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
