//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payments_types::{
    AppError, CreatePaymentRequest, EventPublisher, PaymentId, PaymentRepository, PaymentResponse,
};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<R: PaymentRepository, P: EventPublisher> {
    pub service: PaymentService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("{} not found", msg)),
            // Storage details stay in the logs.
            AppError::Persistence { context, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Create a payment.
#[tracing::instrument(skip(state), fields(method = %req.method, amount = req.amount))]
pub async fn create_payment<R: PaymentRepository, P: EventPublisher>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let payment = state
        .service
        .create_payment(req.amount, &req.method)
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// Get payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: PaymentRepository, P: EventPublisher>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid payment ID".into()))?;

    let payment = state.service.get_payment(payment_id).await?;
    Ok(Json(PaymentResponse::from(payment)))
}
