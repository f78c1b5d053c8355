use api_shared::ErrorRes;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pms_core::PatientError;

/// Error returned by REST handlers.
///
/// Every variant renders as `{"detail": "..."}` with the matching status code. Storage and other
/// internal failures are logged and reported with a generic message.
#[derive(Debug)]
pub enum ApiError {
    Patient(PatientError),
    Rejection { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Patient(e) => match e {
                PatientError::NotFound(_) => StatusCode::NOT_FOUND,
                PatientError::Conflict(_) | PatientError::InvalidArgument(_) => {
                    StatusCode::BAD_REQUEST
                }
                PatientError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Rejection { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Patient(e) => match e {
                PatientError::NotFound(_) => "Patient not found".into(),
                PatientError::Conflict(_) => "Patient ID already exists".into(),
                PatientError::InvalidArgument(msg) | PatientError::Validation(msg) => msg.clone(),
                _ => "Internal error".into(),
            },
            ApiError::Rejection { detail, .. } => detail.clone(),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(e: PatientError) -> Self {
        ApiError::Patient(e)
    }
}

/// Unparseable or mistyped bodies and a missing JSON content type are all 422. Other body
/// failures (length limits, read errors) keep axum's status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonSyntaxError(_)
            | JsonRejection::JsonDataError(_)
            | JsonRejection::MissingJsonContentType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            other => other.status(),
        };
        ApiError::Rejection {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self.detail());
        }
        (status, Json(ErrorRes::new(self.detail()))).into_response()
    }
}
