use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError, repository::RepositoryState};

/// Session tokens are valid for one hour from issuance. No refresh mechanism.
const TOKEN_TTL_SECS: i64 = 3600;

/// Claims
///
/// The payload carried inside a signed session token. The email is the
/// identity key used for every subsequent authorization decision; `exp`
/// is validated on every decode.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity claim: the user's email address.
    pub email: String,
    /// Expiration time (seconds since epoch).
    pub exp: usize,
    /// Issued-at time (seconds since epoch).
    pub iat: usize,
}

/// issue_token
///
/// Signs an identity claim with the server secret. The resulting token
/// expires one hour after issuance.
pub fn issue_token(secret: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        email: email.to_string(),
        iat: iat as usize,
        exp: (iat + TOKEN_TTL_SECS) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// verify_token
///
/// Decodes a bearer token and validates its signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Extracting this from a
/// request *is* the "require authentication" check: a missing, malformed, or
/// expired token rejects the request with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity claim carried by the verified token.
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        // Bearer token extraction from the Authorization header.
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims =
            verify_token(&config.jwt_secret, token).map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser {
            email: claims.email,
        })
    }
}

/// AdminUser
///
/// The "require admin" check, layered on top of `AuthUser`: the token is
/// verified first, then the resolved email is looked up in the user store.
/// An absent record or a role other than `admin` rejects with 403.
///
/// The token itself carries no role claim, so a promotion or demotion takes
/// effect on the very next request rather than at the next token issuance.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
    RepositoryState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Identity must resolve before the role can be checked.
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        let repo = RepositoryState::from_ref(state);
        let is_admin = repo
            .is_admin(&auth_user.email)
            .await
            .map_err(ApiError::Database)?;

        if !is_admin {
            return Err(ApiError::Forbidden);
        }

        Ok(AdminUser {
            email: auth_user.email,
        })
    }
}
