use axum::{extract::rejection::JsonRejection, response::Html, Json};
use tracing::{error, info, instrument, warn};

use crate::calculator::dto::{OperationRequest, OperationResponse};
use crate::calculator::ops;
use crate::error::ApiError;

/// Static calculator page.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Malformed operation bodies surface as 400 with the standard error
/// envelope, not axum's default rejection.
fn parse(payload: Result<Json<OperationRequest>, JsonRejection>) -> Result<OperationRequest, ApiError> {
    match payload {
        Ok(Json(op)) => Ok(op),
        Err(rejection) => {
            warn!(error = %rejection, "invalid operation body");
            Err(ApiError::bad_request(rejection.body_text()))
        }
    }
}

#[instrument(skip(payload))]
pub async fn add(
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let op = parse(payload)?;
    let result = ops::add(op.a, op.b);
    info!(a = op.a, b = op.b, result, "add");
    Ok(Json(OperationResponse { result }))
}

#[instrument(skip(payload))]
pub async fn subtract(
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let op = parse(payload)?;
    let result = ops::subtract(op.a, op.b);
    info!(a = op.a, b = op.b, result, "subtract");
    Ok(Json(OperationResponse { result }))
}

#[instrument(skip(payload))]
pub async fn multiply(
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let op = parse(payload)?;
    let result = ops::multiply(op.a, op.b);
    info!(a = op.a, b = op.b, result, "multiply");
    Ok(Json(OperationResponse { result }))
}

#[instrument(skip(payload))]
pub async fn divide(
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let op = parse(payload)?;
    match ops::divide(op.a, op.b) {
        Ok(result) => {
            info!(a = op.a, b = op.b, result, "divide");
            Ok(Json(OperationResponse { result }))
        }
        Err(e) => {
            error!(a = op.a, b = op.b, error = %e, "divide failed");
            Err(ApiError::bad_request(e.to_string()))
        }
    }
}
