use axum::extract::rejection::JsonRejection;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Terminal request errors. Resolution failures abort before any mutation, so
/// a non-`ok` response always means the store is unchanged.
#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("Package release not found")]
    PackageReleaseNotFound,

    #[error("Package not found")]
    PackageNotFound,

    #[error("No fields provided to update")]
    NoFieldsProvided,

    #[error("You have already starred this package")]
    AlreadyStarred,

    #[error("You have not starred this package")]
    NotStarred,

    #[error("Invalid request body: {0}")]
    BadRequestBody(#[from] JsonRejection),

    #[error("Store RPC failed: {0}")]
    StoreUnavailable(String),
}

impl RegistryError {
    /// Stable machine-readable code; callers branch on this, not the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::PackageReleaseNotFound => "package_release_not_found",
            RegistryError::PackageNotFound => "package_not_found",
            RegistryError::NoFieldsProvided => "no_fields_provided",
            RegistryError::AlreadyStarred => "already_starred",
            RegistryError::NotStarred => "not_starred",
            RegistryError::BadRequestBody(_) => "invalid_request_body",
            RegistryError::StoreUnavailable(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            RegistryError::PackageReleaseNotFound | RegistryError::PackageNotFound => {
                StatusCode::NOT_FOUND
            }
            RegistryError::NoFieldsProvided
            | RegistryError::AlreadyStarred
            | RegistryError::NotStarred
            | RegistryError::BadRequestBody(_) => StatusCode::BAD_REQUEST,
            RegistryError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match &self {
            // Internal details stay in logs, not in the response.
            RegistryError::StoreUnavailable(detail) => {
                tracing::error!(detail = %detail, "store RPC failure");
                ErrorBody {
                    error_code: self.error_code().to_string(),
                    message: "An internal server error occurred.".to_string(),
                }
            }
            _ => ErrorBody {
                error_code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            RegistryError::PackageReleaseNotFound.error_code(),
            "package_release_not_found"
        );
        assert_eq!(RegistryError::PackageNotFound.error_code(), "package_not_found");
        assert_eq!(RegistryError::NoFieldsProvided.error_code(), "no_fields_provided");
        assert_eq!(RegistryError::AlreadyStarred.error_code(), "already_starred");
    }

    #[test]
    fn not_found_maps_to_404_and_conflicts_to_400() {
        assert_eq!(RegistryError::PackageNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            RegistryError::PackageReleaseNotFound.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(RegistryError::AlreadyStarred.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RegistryError::NoFieldsProvided.status(), StatusCode::BAD_REQUEST);
    }
}
