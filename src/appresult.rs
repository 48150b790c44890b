use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, expired or badly signed credential.
    #[error("{0}")]
    Unauthorized(String),

    /// The credential verified but lacks a field the endpoint needs.
    #[error("Abnormal Token")]
    MalformedClaim,

    #[error("Insufficient parameters")]
    InsufficientParameters,

    /// Caller input the endpoint or the store refused.
    #[error("{0}")]
    BadParameters(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_parameters() -> Self {
        Self::BadParameters("Bad parameters".to_owned())
    }

    pub fn bad_parameter() -> Self {
        Self::BadParameters("Bad parameter".to_owned())
    }

    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MalformedClaim | InsufficientParameters | BadParameters(_) => StatusCode::BAD_REQUEST,
            StoreUnavailable(_) | Store(_) | Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error::*;
        match err {
            PoolTimedOut | PoolClosed | Io(_) | Tls(_) | Configuration(_) => Self::StoreUnavailable(err),
            _ => Self::Store(err),
        }
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Unexpected(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
