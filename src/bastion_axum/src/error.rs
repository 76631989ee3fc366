use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bastion_core::{AuthError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Missing or malformed bearer token")]
    MissingToken,
}

impl AuthApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthApiError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthApiError::Auth(error) => match error {
                AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::WrongPurpose { .. }
                | AuthError::TokenReused
                | AuthError::TokenRevoked => StatusCode::UNAUTHORIZED,
                AuthError::LockedOut => StatusCode::TOO_MANY_REQUESTS,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::TwoFactorAlreadyEnabled | AuthError::TwoFactorNotEnrolled => {
                    StatusCode::CONFLICT
                }
                AuthError::Unavailable(_) | AuthError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status_code = self.status();

        let error_message = match &self {
            // Every token rejection renders the same body.
            AuthApiError::Auth(error) if error.is_token_rejection() => {
                AuthError::InvalidToken.to_string()
            }
            AuthApiError::Auth(AuthError::Unavailable(_) | AuthError::Internal(_)) => {
                tracing::error!(error = %self, "Request failed");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}
