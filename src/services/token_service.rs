use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    auth::{password::verify_password, Claims, JwtService},
    errors::{AppError, AppResult},
    models::domain::{refresh_token::hash_token, RefreshTokenRecord, User},
    repositories::{RefreshTokenRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, rotates and revokes access/refresh token pairs. Every issued
/// refresh token gets a ledger record; rotation revokes the presented token
/// and issues a successor, so a once-used refresh token can never be replayed.
pub struct TokenService {
    jwt: JwtService,
    users: Arc<dyn UserRepository>,
    ledger: Arc<dyn RefreshTokenRepository>,
}

impl TokenService {
    pub fn new(
        jwt: JwtService,
        users: Arc<dyn UserRepository>,
        ledger: Arc<dyn RefreshTokenRepository>,
    ) -> Self {
        Self { jwt, users, ledger }
    }

    async fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let access_token = self.jwt.create_access_token(user)?;
        let refresh_token = self.jwt.create_refresh_token(&user.username)?;

        let expires_at = Utc::now() + Duration::hours(self.jwt.refresh_ttl_hours());
        let record =
            RefreshTokenRecord::new(user.subject(), hash_token(&refresh_token), expires_at);
        self.ledger.insert(record).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials.".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials.".to_string()));
        }

        let pair = self.issue_pair(&user).await?;
        log::info!("User {} logged in", user.username);

        Ok((user, pair))
    }

    /// Rotation, not reuse: the presented refresh token is revoked before a
    /// successor pair is issued. Two concurrent calls with the same token
    /// produce exactly one success; the loser finds the record already
    /// revoked.
    pub async fn refresh(&self, presented: &str) -> AppResult<TokenPair> {
        let claims = self.jwt.validate_refresh_token(presented)?;
        let hash = hash_token(presented);

        let record = match self.ledger.claim_for_rotation(&hash).await? {
            Some(record) => record,
            None => {
                // Distinguish a replayed (revoked) token from one we never issued
                return match self.ledger.find_by_token_hash(&hash).await? {
                    Some(_) => Err(AppError::TokenRevoked),
                    None => Err(AppError::TokenInvalid(
                        "refresh token is not recognized".to_string(),
                    )),
                };
            }
        };

        if record.expires_at <= Utc::now() {
            return Err(AppError::TokenExpired);
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::TokenInvalid("user for refresh token no longer exists".to_string())
            })?;

        let pair = self.issue_pair(&user).await?;
        log::info!("Rotated refresh token for user {}", user.username);

        Ok(pair)
    }

    /// Idempotent: revoking an already-revoked token succeeds. Only a token
    /// that fails signature checks is an error.
    pub async fn logout(&self, presented: &str) -> AppResult<()> {
        match self.jwt.validate_refresh_token(presented) {
            Ok(_) | Err(AppError::TokenExpired) => {}
            Err(e) => return Err(e),
        }

        self.ledger.revoke_by_token_hash(&hash_token(presented)).await
    }

    /// Stateless check of an access token; the revocation ledger is never
    /// consulted (access tokens self-expire quickly by design).
    pub fn authenticate(&self, access_token: &str) -> AppResult<Claims> {
        self.jwt.validate_access_token(access_token)
    }
}
