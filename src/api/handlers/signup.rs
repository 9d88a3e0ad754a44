use crate::signup::{RegistrationSubmission, SignupValidator, ValidationErrors};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// Documented shape of the signup body. The handler parses leniently, so any
/// of these may be missing or mistyped and will show up in `errors`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    password: Option<String>,
    re_password: Option<String>,
    email: Option<String>,
    username: Option<String>,
    start_year: Option<i64>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub success: bool,
    pub errors: ValidationErrors,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupFailure {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path= "/credentials/signup/signup",
    request_body = SignupRequest,
    responses (
        (status = 200, description = "Signup details are valid", body = SignupResponse, content_type = "application/json"),
        (status = 400, description = "One or more fields are invalid", body = SignupResponse, content_type = "application/json"),
        (status = 500, description = "Account store could not be queried", body = SignupFailure, content_type = "application/json"),
    ),
    tag= "signup"
)]
// axum handler for signup
#[instrument(skip(validator, payload))]
pub async fn signup(
    validator: Extension<Arc<SignupValidator>>,
    payload: Option<Json<Value>>,
) -> Response {
    // a missing or non-JSON body is validated as an empty submission
    let body = payload.map_or(Value::Null, |Json(value)| value);
    let submission = RegistrationSubmission::from_json(&body);

    debug!("submission: {:?}", submission);

    match validator.validate(&submission).await {
        Ok(errors) if errors.is_empty() => (
            StatusCode::OK,
            Json(SignupResponse {
                success: true,
                errors,
            }),
        )
            .into_response(),
        Ok(errors) => (
            StatusCode::BAD_REQUEST,
            Json(SignupResponse {
                success: false,
                errors,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Error checking username availability: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SignupFailure {
                    success: false,
                    message: "Unable to validate signup".to_string(),
                }),
            )
                .into_response()
        }
    }
}
