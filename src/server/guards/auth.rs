use crate::error::ErrorBody;
use crate::server::router::RegistryState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;

/// Authenticated session for routes that need an acting account.
///
/// Resolved from the `Authorization: Bearer` header against the configured
/// session table. Token comparison is constant-time per candidate entry.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub account_id: String,
}

fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

impl FromRequestParts<RegistryState> for SessionAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RegistryState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;

        let account_id = state.sessions.iter().find_map(|(candidate, account_id)| {
            bool::from(token.as_bytes().ct_eq(candidate.as_bytes())).then(|| account_id.clone())
        });

        match account_id {
            Some(account_id) => Ok(SessionAuth { account_id }),
            None => Err(AuthError::InvalidToken),
        }
    }
}

pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing session token",
            AuthError::InvalidToken => "Invalid session token",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error_code: "unauthorized".to_string(),
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}
