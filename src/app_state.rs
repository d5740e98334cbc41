use std::sync::Arc;
use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use secrecy::ExposeSecret;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    pipeline::{OpenAiQuizSynthesizer, PipelineOrchestrator, WhisperTranscriber, YtDlpExtractor},
    repositories::{
        MongoQuizRepository, MongoRefreshTokenRepository, MongoUserRepository, QuizRepository,
        RefreshTokenRepository, UserRepository,
    },
    services::{QuizService, TokenService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub token_service: Arc<TokenService>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let quiz_repository: Arc<dyn QuizRepository> = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let refresh_token_repository: Arc<dyn RefreshTokenRepository> =
            Arc::new(MongoRefreshTokenRepository::new(&db));
        refresh_token_repository.ensure_indexes().await?;

        let jwt_service = JwtService::new(
            &config.jwt_secret,
            config.access_token_ttl_minutes,
            config.refresh_token_ttl_hours,
        );

        let openai_client = Client::with_config(
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret()),
        );

        let orchestrator = Arc::new(PipelineOrchestrator::new(
            Arc::new(YtDlpExtractor::new(&config)),
            Arc::new(WhisperTranscriber::new(
                openai_client.clone(),
                config.transcription_model.clone(),
                config.max_audio_duration_secs,
            )),
            Arc::new(OpenAiQuizSynthesizer::new(
                openai_client,
                config.generation_model.clone(),
                config.upstream_retry_attempts,
            )),
            quiz_repository.clone(),
            Duration::from_secs(config.stage_timeout_secs),
        ));

        let user_service = Arc::new(UserService::new(user_repository.clone()));
        let quiz_service = Arc::new(QuizService::new(quiz_repository, orchestrator));
        let token_service = Arc::new(TokenService::new(
            jwt_service.clone(),
            user_repository,
            refresh_token_repository,
        ));

        Ok(Self {
            db,
            user_service,
            quiz_service,
            token_service,
            jwt_service,
            config: Arc::new(config),
        })
    }
}
