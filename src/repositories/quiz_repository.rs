use async_trait::async_trait;
use futures::TryStreamExt;
use log::info;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a quiz with its embedded questions in one write. A quiz is a
    /// single document, so the insert is atomic: either the whole quiz exists
    /// or nothing does.
    async fn insert(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Quiz>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn insert(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Quiz>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "owner_id": owner_id })
            .with_options(find_options)
            .await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;

        Ok(quizzes)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_options = IndexOptions::builder().unique(true).build();
        let id_model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(id_options)
            .build();
        self.collection.create_index(id_model).await?;
        info!("Created unique index on quizzes.id");

        let owner_model = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "created_at": -1 })
            .build();
        self.collection.create_index(owner_model).await?;
        info!("Created index on quizzes.owner_id");

        Ok(())
    }
}
