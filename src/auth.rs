//! Pluggable request authentication.
//!
//! One strategy is selected from configuration at startup and shared through
//! [`AppState`](crate::routes::AppState); handlers receive the caller's user
//! id through the [`AuthenticatedUser`] extractor and never touch the
//! strategy directly.

use actix_web::{dev::Payload, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::sync::Arc;
use thiserror::Error;

use crate::config::AuthSettings;
use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown auth strategy: {0}")]
    UnknownStrategy(String),

    #[error("Auth strategy '{0}' requires a secret")]
    MissingSecret(String),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: self.to_string(),
            status_code: 401,
        })
    }
}

/// Authentication strategy: resolve a request to a user id
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, req: &HttpRequest) -> Result<String, AuthError>;
}

/// Build the configured strategy; exactly one is active per deployment
pub fn from_settings(settings: &AuthSettings) -> Result<Arc<dyn Authenticator>, AuthError> {
    match settings.strategy.as_str() {
        "jwt" => {
            let secret = settings
                .jwt_secret
                .clone()
                .ok_or_else(|| AuthError::MissingSecret("jwt".to_string()))?;
            Ok(Arc::new(JwtAuthenticator {
                secret,
                session_cookie: settings.session_cookie.clone(),
            }))
        }
        "header" => Ok(Arc::new(HeaderAuthenticator {
            header: settings.trusted_header.clone(),
        })),
        other => Err(AuthError::UnknownStrategy(other.to_string())),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// HS256 session tokens, from a bearer header or the session cookie
pub struct JwtAuthenticator {
    secret: String,
    session_cookie: String,
}

impl JwtAuthenticator {
    fn token_from(&self, req: &HttpRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        bearer.or_else(|| req.cookie(&self.session_cookie).map(|c| c.value().to_string()))
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, req: &HttpRequest) -> Result<String, AuthError> {
        let token = self.token_from(req).ok_or(AuthError::MissingCredentials)?;

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims.sub)
    }
}

/// Trusted identity header, for deployments where an upstream gateway has
/// already terminated the session
pub struct HeaderAuthenticator {
    header: String,
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, req: &HttpRequest) -> Result<String, AuthError> {
        req.headers()
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(AuthError::MissingCredentials)
    }
}

/// The authenticated caller's user id
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<actix_web::web::Data<crate::routes::AppState>>() {
            Some(state) => state
                .auth
                .authenticate(req)
                .map(AuthenticatedUser)
                .map_err(Into::into),
            None => Err(actix_web::error::ErrorInternalServerError(
                "application state not configured",
            )),
        };
        ready(result)
    }
}
