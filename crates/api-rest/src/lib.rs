//! # API REST
//!
//! REST API implementation for the patient management system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS)
//!
//! Data operations live in `pms-core`; this crate only maps them onto HTTP.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{PatientListing, SortParams};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use pms_core::{PatientService, PatientStore};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Patient service over whichever backend the binary selected.
pub type DynPatientService = PatientService<Box<dyn PatientStore>>;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    patients: DynPatientService,
}

impl AppState {
    pub fn new(store: impl PatientStore + 'static) -> Self {
        Self {
            patients: PatientService::new(Box::new(store) as Box<dyn PatientStore>),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::hello,
        handlers::about,
        handlers::health,
        handlers::view,
        handlers::view_patient,
        handlers::sort_patients,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
    ),
    components(schemas(
        api_shared::MessageRes,
        api_shared::ErrorRes,
        api_shared::HealthRes,
        pms_core::NewPatient,
        pms_core::PatientUpdate,
        pms_core::PatientView,
        pms_core::Gender,
        pms_core::Verdict,
        PatientListing,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/about", get(handlers::about))
        .route("/health", get(handlers::health))
        .route("/view", get(handlers::view))
        .route("/patient/:id", get(handlers::view_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:id", put(handlers::update_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
