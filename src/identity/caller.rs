use axum::{extract::{FromRef, FromRequestParts}, http::request::Parts};

use crate::{AppError, AppResult};

use super::{IdentityClaim, IdentityResolver};

pub const TOKEN_HEADER: &str = "token";

/// The verified identity behind a request, read from the `token` header.
pub struct Caller(pub IdentityClaim);

impl<S> FromRequestParts<S> for Caller
where
    IdentityResolver: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let token = match parts.headers.get(TOKEN_HEADER) {
            Some(value) if !value.is_empty() => value
                .to_str()
                .map_err(|_| AppError::Unauthorized("JsonWebTokenError: jwt malformed".to_owned()))?,
            _ => return Err(AppError::Unauthorized("Token not found".to_owned())),
        };

        let identity = IdentityResolver::from_ref(state);
        Ok(Caller(identity.resolve(token)?))
    }
}
