use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use bookstall_authz::{bearer_token, AuthError};
use bookstall_http::AppError;

use crate::error::auth_failure;
use crate::modules::sellers::{models::Seller, repository as sellers};
use crate::state::AppState;

/// The seller identified by the request's bearer token.
///
/// Rejects with 401 when the header is missing or malformed, the token does
/// not verify, or its subject no longer names a seller.
#[derive(Debug, Clone)]
pub struct CurrentSeller(pub Seller);

impl FromRequestParts<AppState> for CurrentSeller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)
            .map_err(auth_failure)?;

        let claims = state.tokens.verify(token).map_err(auth_failure)?;

        let seller = sellers::find_by_email(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(subject = %claims.sub, "token subject has no seller");
                AppError::unauthorized("Could not validate credentials")
            })?;

        Ok(CurrentSeller(seller))
    }
}
