use std::str::FromStr as _;

use axum::{Json, http::StatusCode};
use chrono::NaiveDateTime;
use lotto_core::GameType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::DbPool;
use crate::error::{FieldError, ServiceError};

#[derive(Clone)]
pub(super) struct RouterState {
    pub(super) pool: DbPool,
}

#[derive(Serialize, JsonSchema)]
pub(super) struct ApiResponse {
    success: bool,
    data: Option<Value>,
    error: Option<ErrorResponse>,
}

#[derive(Serialize, JsonSchema)]
pub(super) struct ErrorResponse {
    status: u16,
    message: String,
    errors: Vec<FieldError>,
}

pub(super) type ApiResult = (StatusCode, Json<ApiResponse>);

pub(super) fn ok_value(status: StatusCode, value: Value) -> ApiResult {
    (
        status,
        Json(ApiResponse {
            success: true,
            data: Some(value),
            error: None,
        }),
    )
}

pub(super) fn err_response(
    status: StatusCode,
    message: impl Into<String>,
    errors: Vec<FieldError>,
) -> ApiResult {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                status: status.as_u16(),
                message: message.into(),
                errors,
            }),
        }),
    )
}

pub(super) fn service_error(err: &ServiceError) -> ApiResult {
    let status = match err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
        ServiceError::Conflict(_) | ServiceError::Mismatch(_) => StatusCode::CONFLICT,
        ServiceError::Internal(e) => {
            log::error!("Request failed: {e:#}");
            return err_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error",
                Vec::new(),
            );
        }
    };
    log::debug!("Request rejected with {status}: {err}");
    err_response(status, err.to_string(), err.field_errors().to_vec())
}

/// Serialize a service outcome into the envelope.
pub(super) fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> ApiResult {
    match result.and_then(|data| serde_json::to_value(data).map_err(|e| ServiceError::Internal(e.into()))) {
        Ok(value) => ok_value(status, value),
        Err(e) => service_error(&e),
    }
}

/// Accepts the route slug (`mega`) or the full id (`mega_6_45`).
pub(super) fn parse_game(segment: &str) -> Result<GameType, ServiceError> {
    GameType::from_slug(segment)
        .or_else(|| GameType::from_str(segment).ok())
        .ok_or_else(|| ServiceError::NotFound(format!("unknown game {segment:?}")))
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct GamePath {
    /// `mega` or `power`
    pub(super) game: String,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct GameDrawingPath {
    pub(super) game: String,
    pub(super) id: i32,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct IdPath {
    pub(super) id: i32,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct DrawsQuery {
    /// Default 10, at most 100.
    pub(super) limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct PublishDrawingRequest {
    pub(super) draw_time: NaiveDateTime,
    /// Generated when omitted.
    pub(super) numbers: Option<Vec<i32>>,
    pub(super) bonus_number: Option<i32>,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct NewCategoryRequest {
    pub(super) name: String,
    pub(super) match_count: i32,
    #[serde(default)]
    pub(super) include_bonus: bool,
    #[serde(default)]
    pub(super) prize_amount: i64,
    #[serde(default)]
    pub(super) prize_percentage: f64,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct BuyTicketRequest {
    pub(super) user_id: i32,
    pub(super) numbers: Vec<i32>,
    pub(super) drawing_id: Option<i32>,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct AttachDrawingRequest {
    pub(super) drawing_id: i32,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct RegisterUserRequest {
    pub(super) username: String,
    pub(super) email: String,
}

#[derive(Deserialize, JsonSchema)]
pub(super) struct UpdateUserRequest {
    pub(super) username: Option<String>,
    pub(super) email: Option<String>,
}
