//! Error types for the API server.
//!
//! [`ApiError`] unifies the core error taxonomies into a single enum
//! that can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Status mapping:
//!
//! - absent resources and empty charts are `404 Not Found`
//! - a non-teacher attempting a grant is `403 Forbidden`
//! - a declined purchase is `402 Payment Required`, never a 404
//! - a reconciliation gap or adapter failure is `500 Internal Server
//!   Error` with no internals leaked to the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kudos_chart::ChartError;
use kudos_history::HistoryError;
use kudos_ledger::LedgerError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting user lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The purchase was declined for lack of coins.
    #[error("payment required: have {have} coins, need {need}")]
    PaymentRequired {
        /// The buyer's coin balance at decision time.
        have: u64,
        /// The reward's price.
        need: u64,
    },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::PaymentRequired { have, need } => (
                StatusCode::PAYMENT_REQUIRED,
                format!("insufficient funds: have {have} coins, need {need}"),
            ),
            Self::Internal(msg) => {
                // Internals go to the log, not the client.
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("internal server error"),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(msg) => Self::NotFound(msg),
            LedgerError::PermissionDenied(msg) => Self::Forbidden(msg),
            LedgerError::InsufficientFunds { have, need } => Self::PaymentRequired { have, need },
            LedgerError::Reconciliation { .. } | LedgerError::Store(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::NothingToDisplay(_) => Self::NotFound(err.to_string()),
            ChartError::Serialization(_) | ChartError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NotFound(msg) => Self::NotFound(msg),
            HistoryError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<kudos_db::DbError> for ApiError {
    fn from(err: kudos_db::DbError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}
