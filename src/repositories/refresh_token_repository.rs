use async_trait::async_trait;
use log::info;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::RefreshTokenRecord};

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, record: RefreshTokenRecord) -> AppResult<RefreshTokenRecord>;
    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshTokenRecord>>;
    /// Atomically flip an active record to revoked and return its pre-image.
    /// Of two concurrent rotations presenting the same token, exactly one
    /// observes the active record; the loser gets `None`.
    async fn claim_for_rotation(&self, hash: &str) -> AppResult<Option<RefreshTokenRecord>>;
    /// Idempotent revocation: revoking an already-revoked record is a no-op.
    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoRefreshTokenRepository {
    collection: Collection<RefreshTokenRecord>,
}

impl MongoRefreshTokenRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("refresh_tokens");
        Self { collection }
    }
}

#[async_trait]
impl RefreshTokenRepository for MongoRefreshTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> AppResult<RefreshTokenRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshTokenRecord>> {
        let record = self
            .collection
            .find_one(doc! { "token_hash": hash })
            .await?;
        Ok(record)
    }

    async fn claim_for_rotation(&self, hash: &str) -> AppResult<Option<RefreshTokenRecord>> {
        let record = self
            .collection
            .find_one_and_update(
                doc! { "token_hash": hash, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;

        Ok(record)
    }

    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "token_hash": hash },
                doc! { "$set": { "revoked": true } },
            )
            .await?;

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let token_hash_options = IndexOptions::builder().unique(true).build();
        let token_hash_model = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(token_hash_options)
            .build();
        self.collection.create_index(token_hash_model).await?;
        info!("Created unique index on refresh_tokens.token_hash");

        let user_id_model = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
        self.collection.create_index(user_id_model).await?;
        info!("Created index on refresh_tokens.user_id");

        Ok(())
    }
}
