use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::{Claims, RefreshClaims},
    errors::{AppError, AppResult},
    models::domain::user::User,
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_minutes: i64,
    refresh_ttl_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, access_ttl_minutes: i64, refresh_ttl_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            access_ttl_minutes,
            refresh_ttl_hours,
        }
    }

    pub fn create_access_token(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.access_ttl_minutes);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    /// Stateless check: signature and expiry only. The revocation ledger is
    /// never consulted for access tokens.
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid(format!("access token rejected: {}", e)),
            })
    }

    pub fn create_refresh_token(&self, username: &str) -> AppResult<String> {
        let claims = RefreshClaims::new(username, self.refresh_ttl_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create refresh token: {}", e)))
    }

    pub fn refresh_ttl_hours(&self) -> i64 {
        self.refresh_ttl_hours
    }

    pub fn access_ttl_minutes(&self) -> i64 {
        self.access_ttl_minutes
    }

    pub fn validate_refresh_token(&self, token: &str) -> AppResult<RefreshClaims> {
        let token_data = decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::TokenInvalid("refresh token format is invalid".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::TokenInvalid("refresh token signature is invalid".to_string())
                }
                _ => AppError::TokenInvalid(format!("refresh token rejected: {}", e)),
            })?;

        // An access token presented on the refresh endpoint is not acceptable
        if token_data.claims.token_type != "refresh" {
            return Err(AppError::TokenInvalid(
                "token is not a refresh token".to_string(),
            ));
        }

        Ok(token_data.claims)
    }
}
