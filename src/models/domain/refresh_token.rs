use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One entry in the append-only refresh-token ledger. Records are created at
/// login and at each rotation; revocation flips `revoked` and nothing is ever
/// physically deleted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefreshTokenRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshTokenRecord {
    pub fn new(user_id: String, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id,
            token_hash,
            issued_at: Utc::now(),
            expires_at,
            revoked: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now()
    }
}

/// Ledger key for a refresh token: sha-256 of the token string, hex-encoded.
/// The raw token never touches the database.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
