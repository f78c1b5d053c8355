use crate::{ApiError, AppState};
use api_shared::{HealthRes, HealthService, MessageRes, SERVICE_ABOUT, SERVICE_BANNER};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use pms_core::{NewPatient, PatientUpdate, PatientView};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use utoipa::{
    openapi::{ObjectBuilder, Ref, RefOr, Schema},
    IntoParams, ToSchema,
};

/// All patients keyed by id, in storage order.
#[derive(Debug)]
pub struct PatientListing(pub Vec<PatientView>);

impl Serialize for PatientListing {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for view in &self.0 {
            map.serialize_entry(&view.id, view)?;
        }
        map.end()
    }
}

impl<'s> ToSchema<'s> for PatientListing {
    fn schema() -> (&'s str, RefOr<Schema>) {
        (
            "PatientListing",
            RefOr::T(Schema::Object(
                ObjectBuilder::new()
                    .description(Some("All patients keyed by id, in storage order"))
                    .additional_properties(Some(Ref::from_schema_name("PatientView")))
                    .build(),
            )),
        )
    }
}

/// Query parameters for `GET /sort`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Sort on the basis of `height`, `weight` or `bmi`
    pub sort_by: String,
    /// Sort in `asc` (default) or `desc` order
    #[serde(default = "default_order")]
    #[param(default = "asc")]
    pub order: String,
}

fn default_order() -> String {
    "asc".into()
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn hello() -> Json<MessageRes> {
    Json(MessageRes::new(SERVICE_BANNER))
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Service description", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn about() -> Json<MessageRes> {
    Json(MessageRes::new(SERVICE_ABOUT))
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
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/view",
    responses(
        (status = 200, description = "All patients keyed by id", body = PatientListing),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// List all patients with their computed BMI and verdict.
#[axum::debug_handler]
pub(crate) async fn view(State(state): State<AppState>) -> Result<Json<PatientListing>, ApiError> {
    let patients = state.patients.list_all()?;
    Ok(Json(PatientListing(patients)))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(
        ("id" = String, Path, description = "The id of the patient to view", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient record", body = PatientView),
        (status = 404, description = "Patient not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn view_patient(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<PatientView>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.patients.get_by_id(&id)?))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortParams),
    responses(
        (status = 200, description = "Sorted patients", body = [PatientView]),
        (status = 400, description = "Invalid sort field or order", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// List all patients sorted by height, weight or BMI.
///
/// Patients with equal values keep their storage order in both directions.
#[axum::debug_handler]
pub(crate) async fn sort_patients(
    State(state): State<AppState>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let Query(params) = params?;
    let sorted = state.patients.sort_by(&params.sort_by, &params.order)?;
    Ok(Json(sorted))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = MessageRes),
        (status = 400, description = "Patient ID already exists", body = api_shared::ErrorRes),
        (status = 422, description = "Invalid patient record", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Create a new patient record
///
/// The id is supplied by the caller and must not exist yet. Every field is validated before the
/// record is stored.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let Json(new_patient) = body?;
    state.patients.create(new_patient)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("Patient created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/edit/{id}",
    params(
        ("id" = String, Path, description = "The id of the patient to update", example = "P001")
    ),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 404, description = "Patient not found", body = api_shared::ErrorRes),
        (status = 422, description = "Merged record is invalid", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Partially update a patient record
///
/// Only fields present in the body are changed. The merged record is validated as a whole and
/// the update is rejected entirely if it is invalid.
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Path(id) = id?;
    let Json(update) = body?;
    state.patients.update(&id, update)?;
    Ok(Json(MessageRes::new("Patient updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(
        ("id" = String, Path, description = "The id of the patient to delete", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_patient(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Path(id) = id?;
    state.patients.delete(&id)?;
    Ok(Json(MessageRes::new("Patient deleted successfully")))
}
