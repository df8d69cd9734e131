use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use validator::Validate;

use crate::AppState;
use crate::error::AppError;
use crate::models::requests::CustomerData;
use crate::models::responses::ChurnPredictionResponse;

// POST /predict
#[utoipa::path(
    post,
    path = "/predict",
    request_body = CustomerData,
    responses(
        (status = 200, body = ChurnPredictionResponse, description = "Churn probability and label"),
        (status = 422, body = crate::error::ErrorBody, description = "Invalid or unscorable customer record"),
        (status = 503, body = crate::error::ErrorBody, description = "Churn model not loaded"),
    ),
    tag = "Churn"
)]
pub async fn predict_churn(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CustomerData>, JsonRejection>,
) -> Result<Json<ChurnPredictionResponse>, AppError> {
    let model = state
        .churn
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Churn model is not loaded"))?;

    let Json(data) = payload?;
    data.validate()?;

    let scored = model.predict(&data)?;
    Ok(Json(ChurnPredictionResponse {
        churn_probability: scored.churn_probability,
        prediction: scored.prediction,
    }))
}
