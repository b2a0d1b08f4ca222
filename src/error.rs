//! Storage errors and their mapping onto HTTP errors.

use serde_json::json;
use thiserror::Error;

use bookstall_authz::AuthError;
use bookstall_http::AppError;

/// Failures raised by the repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seller with email {0} already exists")]
    DuplicateEmail(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Turn a unique-constraint violation on the seller email into
    /// [`StoreError::DuplicateEmail`].
    pub fn from_seller_write(err: sqlx::Error, email: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateEmail(email.to_owned())
            }
            _ => StoreError::Database(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => AppError::conflict(
                vec![json!({ "field": "email", "error": "already_registered" })],
                format!("Seller with email {} already exists", email),
            ),
            StoreError::Database(err) => AppError::Internal(err.into()),
        }
    }
}

/// Map credential failures: bad tokens are the caller's problem, hashing and
/// signing failures are ours.
pub fn auth_failure(err: AuthError) -> AppError {
    if matches!(err, AuthError::MissingToken) {
        AppError::unauthorized("Not authenticated")
    } else if err.is_client_error() {
        AppError::unauthorized("Could not validate credentials")
    } else {
        AppError::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn duplicate_email_is_a_conflict() {
        let err: AppError = StoreError::DuplicateEmail("a@b.io".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_are_internal() {
        let err: AppError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_token_says_not_authenticated() {
        match auth_failure(AuthError::MissingToken) {
            AppError::Unauthorized { message, .. } => assert_eq!(message, "Not authenticated"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn token_errors_are_unauthorized() {
        assert_eq!(
            auth_failure(AuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
