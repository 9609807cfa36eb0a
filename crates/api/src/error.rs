//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledgerview_core::statement::StatementError;
use ledgerview_db::StatementStoreError;
use ledgerview_shared::AppError;
use serde_json::json;
use tracing::error;

/// An `AppError` rendered as `{ "error": code, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self.0 {
            AppError::NotFound(m)
            | AppError::Validation(m)
            | AppError::BusinessRule(m)
            | AppError::Database(m)
            | AppError::Internal(m) => m.clone(),
        };
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<StatementError> for ApiError {
    fn from(err: StatementError) -> Self {
        let message = err.to_string();
        Self(match err {
            StatementError::AccountNotFound(_)
            | StatementError::PartyNotFound(_)
            | StatementError::FiscalYearNotFound(_) => AppError::NotFound(message),
            StatementError::MissingAccount
            | StatementError::MissingFiscalYear
            | StatementError::InvalidOrder(_) => AppError::Validation(message),
            StatementError::ViewAccount(_) => AppError::BusinessRule(message),
            StatementError::UnknownAccountKind(_) | StatementError::InvalidAggregate(_) => {
                error!(error = %message, "Statement data is inconsistent");
                AppError::Internal("Failed to compute statement".to_string())
            }
        })
    }
}

impl From<StatementStoreError> for ApiError {
    fn from(err: StatementStoreError) -> Self {
        match err {
            StatementStoreError::Statement(e) => e.into(),
            StatementStoreError::Database(e) => {
                error!(error = %e, "Statement query failed");
                Self(AppError::Database("An error occurred".to_string()))
            }
        }
    }
}
