use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::AuthError;

/// Claims carried by a Bookstall access token. `sub` is the seller's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: OffsetDateTime,
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    ttl: Duration,
}

impl Debug for TokenIssuer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
            ttl,
        }
    }

    pub fn from_settings(settings: &bookstall_kernel::settings::AuthSettings) -> Self {
        Self::new(
            &settings.jwt_secret,
            Duration::minutes(settings.access_token_ttl_minutes),
        )
    }

    /// Sign a token for `subject` that expires after the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let access_token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Check signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(target: "bookstall-authz", error = %err, "rejected bearer token");
                AuthError::InvalidToken(err)
            })
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new("test_secret_key", Duration::minutes(30));
        let issued = issuer.issue("seller@example.com").unwrap();

        let claims = issuer.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "seller@example.com");
        assert_eq!(claims.exp, issued.expires_at.unix_timestamp());
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenIssuer::new("test_secret_key", Duration::minutes(30));
        let other = TokenIssuer::new("wrong_secret_key", Duration::minutes(30));
        let issued = issuer.issue("seller@example.com").unwrap();

        let err = other.verify(&issued.access_token).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test_secret_key", Duration::minutes(-5));
        let issued = issuer.issue("seller@example.com").unwrap();

        assert!(matches!(
            issuer.verify(&issued.access_token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new("test_secret_key", Duration::minutes(30));
        assert!(issuer.verify("not.a.jwt").is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   abc.def "), Some("abc.def"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
