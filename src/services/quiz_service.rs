use std::sync::Arc;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::dto::response::{QuizDetailDto, QuizSummaryDto},
    pipeline::PipelineOrchestrator,
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    orchestrator: Arc<PipelineOrchestrator>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>, orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    /// Full pipeline: extract, transcribe, synthesize, validate, persist.
    /// The orchestrator has already stored the quiz by the time it returns.
    pub async fn create_from_url(&self, url: &str, claims: &Claims) -> AppResult<QuizDetailDto> {
        let quiz = self
            .orchestrator
            .run(url, &claims.sub)
            .await
            .map_err(AppError::from)?;

        Ok(QuizDetailDto::from(quiz))
    }

    pub async fn get_quiz(&self, id: &str, claims: &Claims) -> AppResult<QuizDetailDto> {
        let quiz = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found.".to_string()))?;

        if quiz.owner_id != claims.sub {
            return Err(AppError::Forbidden(
                "You do not have permission to access this quiz.".to_string(),
            ));
        }

        Ok(QuizDetailDto::from(quiz))
    }

    /// The caller's own quizzes, newest first, without correct answers.
    pub async fn list_quizzes(&self, claims: &Claims) -> AppResult<Vec<QuizSummaryDto>> {
        let quizzes = self.repository.list_by_owner(&claims.sub).await?;
        Ok(quizzes.into_iter().map(QuizSummaryDto::from).collect())
    }
}
