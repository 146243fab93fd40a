use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use tally_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token;

/// Required authentication for write endpoints. Missing or malformed
/// `Authorization: Bearer` header is 401; a token that fails verification is
/// 401; a missing signing secret fails closed with 500.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::AuthRequired)?;
        let secret = state.jwt_secret.as_deref().ok_or(ApiError::MissingSecret)?;

        let claims = token::verify(secret, token).map_err(|_| ApiError::AuthInvalid)?;
        Ok(AuthUser(claims))
    }
}

/// Optional viewer identity for the public listing: best-effort decode,
/// where an absent, invalid, or expired token downgrades to anonymous
/// instead of failing the request. Write endpoints reject instead — the
/// asymmetry is deliberate.
pub struct Viewer(pub Option<Claims>);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts)
            .zip(state.jwt_secret.as_deref())
            .and_then(|(token, secret)| token::verify(secret, token).ok());

        Ok(Viewer(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
