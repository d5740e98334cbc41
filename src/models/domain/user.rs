use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext password.
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, email: &str, password_hash: &str) -> Self {
        User {
            id: None,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// Stable subject identifier used in token claims and quiz ownership.
    /// Falls back to the username for users not yet persisted.
    pub fn subject(&self) -> String {
        self.id
            .as_ref()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(
            username,
            &format!("{}@example.com", username),
            "$argon2id$v=19$m=19456,t=2,p=1$dGVzdHNhbHQ$placeholder",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("johndoe", "john@example.com", "$argon2id$hash");
        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "john@example.com");
        assert!(user.created_at.is_some());
        assert!(user.id.is_none());
    }

    #[test]
    fn test_subject_falls_back_to_username() {
        let user = User::test_user("johndoe");
        assert_eq!(user.subject(), "johndoe");
    }

    #[test]
    fn test_subject_uses_object_id_when_present() {
        let mut user = User::test_user("johndoe");
        let oid = ObjectId::new();
        user.id = Some(oid);
        assert_eq!(user.subject(), oid.to_hex());
    }
}
