use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::{
    errors::AppError,
    models::domain::Quiz,
    pipeline::{
        extractor::{canonical_watch_url, extract_video_id, ExtractError, MediaExtractor},
        synthesizer::{QuizSynthesizer, SynthesisError},
        transcriber::{TranscribeError, Transcriber},
        validator::{validate, SchemaViolation},
    },
    repositories::QuizRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Pending,
    Extracting,
    Transcribing,
    Synthesizing,
    Validating,
    Persisting,
    Completed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Pending => write!(f, "pending"),
            Stage::Extracting => write!(f, "extracting"),
            Stage::Transcribing => write!(f, "transcribing"),
            Stage::Synthesizing => write!(f, "synthesizing"),
            Stage::Validating => write!(f, "validating"),
            Stage::Persisting => write!(f, "persisting"),
            Stage::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    #[error(transparent)]
    Synthesize(#[from] SynthesisError),

    #[error(transparent)]
    Validate(#[from] SchemaViolation),

    #[error("stage timed out after {0:?}")]
    Timeout(Duration),

    #[error("persistence failed: {0}")]
    Persist(#[from] AppError),
}

#[derive(Debug, Error)]
#[error("pipeline failed at {stage}: {reason}")]
pub struct PipelineFailure {
    pub stage: Stage,
    pub reason: StageError,
}

impl PipelineFailure {
    fn is_malformed_response(&self) -> bool {
        matches!(
            self.reason,
            StageError::Synthesize(SynthesisError::MalformedResponse(_))
        )
    }
}

impl From<PipelineFailure> for AppError {
    fn from(failure: PipelineFailure) -> Self {
        match failure.reason {
            StageError::Extract(ExtractError::UnsupportedSource(msg)) => {
                AppError::UnsupportedSource(msg)
            }
            StageError::Extract(ExtractError::Extraction(msg)) => {
                AppError::ValidationError(format!("Media extraction failed: {}", msg))
            }
            StageError::Extract(err @ ExtractError::Network { .. }) => {
                AppError::UpstreamError(err.to_string())
            }
            StageError::Transcribe(err @ TranscribeError::TooLong { .. })
            | StageError::Transcribe(err @ TranscribeError::EmptyAudio) => {
                AppError::ValidationError(err.to_string())
            }
            StageError::Transcribe(err @ TranscribeError::Failed(_)) => {
                AppError::UpstreamError(err.to_string())
            }
            StageError::Synthesize(err) => AppError::UpstreamError(err.to_string()),
            StageError::Validate(violation) => AppError::SchemaViolation(violation.to_string()),
            StageError::Timeout(_) => AppError::UpstreamError(format!(
                "{} stage timed out",
                failure.stage
            )),
            StageError::Persist(err) => err,
        }
    }
}

/// One in-flight generation attempt. Lives only for the duration of a single
/// `run` call; nothing about it is persisted.
struct PipelineRun {
    url: String,
    stage: Stage,
    started_at: Instant,
}

impl PipelineRun {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            stage: Stage::Pending,
            started_at: Instant::now(),
        }
    }

    fn advance(&mut self, next: Stage) {
        log::info!("Pipeline run for {}: {} -> {}", self.url, self.stage, next);
        self.stage = next;
    }

    fn fail(&self, reason: impl Into<StageError>) -> PipelineFailure {
        let failure = PipelineFailure {
            stage: self.stage,
            reason: reason.into(),
        };
        log::error!("Pipeline run for {} failed: {}", self.url, failure);
        failure
    }
}

/// Sequences extraction, transcription, synthesis, validation and
/// persistence. The only component that re-prompts or fails a whole run;
/// each stage stays individually testable behind its trait.
pub struct PipelineOrchestrator {
    extractor: Arc<dyn MediaExtractor>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn QuizSynthesizer>,
    quizzes: Arc<dyn QuizRepository>,
    stage_timeout: Duration,
}

impl PipelineOrchestrator {
    pub fn new(
        extractor: Arc<dyn MediaExtractor>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn QuizSynthesizer>,
        quizzes: Arc<dyn QuizRepository>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            synthesizer,
            quizzes,
            stage_timeout,
        }
    }

    /// External stages run under a per-call timeout so a stalled upstream
    /// fails the run instead of blocking it indefinitely.
    async fn timed<T, E>(
        &self,
        run: &PipelineRun,
        fut: impl std::future::Future<Output = Result<T, E>>,
    ) -> Result<T, PipelineFailure>
    where
        StageError: From<E>,
    {
        match tokio::time::timeout(self.stage_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(run.fail(e)),
            Err(_) => Err(run.fail(StageError::Timeout(self.stage_timeout))),
        }
    }

    pub async fn run(&self, url: &str, owner_id: &str) -> Result<Quiz, PipelineFailure> {
        let mut run = PipelineRun::new(url);

        run.advance(Stage::Extracting);
        let video_id = extract_video_id(url).map_err(|e| run.fail(e))?;
        let canonical = canonical_watch_url(&video_id);
        let artifact = self
            .timed(&run, self.extractor.extract(&canonical))
            .await?;

        run.advance(Stage::Transcribing);
        let transcript = self
            .timed(&run, self.transcriber.transcribe(&artifact))
            .await?;
        // Release the temp audio file before the slow generation stage
        drop(artifact);

        run.advance(Stage::Synthesizing);
        let candidate = match self
            .timed(&run, self.synthesizer.synthesize(&transcript))
            .await
        {
            Ok(candidate) => candidate,
            Err(failure) if failure.is_malformed_response() => {
                // Exactly one re-prompt, same transcript, same prompt
                log::warn!(
                    "Re-prompting after malformed quiz payload for {}",
                    run.url
                );
                self.timed(&run, self.synthesizer.synthesize(&transcript))
                    .await?
            }
            Err(failure) => return Err(failure),
        };

        run.advance(Stage::Validating);
        let valid = validate(candidate).map_err(|e| run.fail(e))?;

        run.advance(Stage::Persisting);
        let quiz = valid.into_quiz(owner_id, &canonical);
        let quiz = self
            .quizzes
            .insert(quiz)
            .await
            .map_err(|e| run.fail(StageError::Persist(e)))?;

        run.advance(Stage::Completed);
        log::info!(
            "Pipeline run for {} completed in {:?}",
            run.url,
            run.started_at.elapsed()
        );

        Ok(quiz)
    }
}
