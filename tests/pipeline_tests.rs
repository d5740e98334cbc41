use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizcast_server::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Quiz,
    pipeline::{
        AudioArtifact, CandidateQuestion, CandidateQuiz, ExtractError, MediaExtractor,
        PipelineOrchestrator, QuizSynthesizer, Stage, StageError, SynthesisError, TranscribeError,
        Transcriber,
    },
    repositories::QuizRepository,
    services::QuizService,
};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn candidate_quiz(question_count: usize) -> CandidateQuiz {
    CandidateQuiz {
        title: "Generated quiz".to_string(),
        description: "A quiz generated from a transcript".to_string(),
        questions: (0..question_count)
            .map(|i| {
                let options: Vec<String> = (0..4).map(|o| format!("Option {}-{}", i, o)).collect();
                CandidateQuestion {
                    question_title: format!("Question number {}?", i),
                    answer: options[0].clone(),
                    question_options: options,
                }
            })
            .collect(),
    }
}

fn claims_for(subject: &str) -> Claims {
    Claims {
        sub: subject.to_string(),
        username: subject.to_string(),
        email: format!("{}@example.com", subject),
        exp: 9999999999,
        iat: 0,
    }
}

/// Extractor stub that materializes a real temp file, so artifact cleanup is
/// observable from the outside.
struct StubExtractor {
    dir: PathBuf,
    result: Option<ExtractError>,
}

impl StubExtractor {
    fn succeeding(dir: &tempfile::TempDir) -> Self {
        Self {
            dir: dir.path().to_path_buf(),
            result: None,
        }
    }

    fn audio_path(&self) -> PathBuf {
        self.dir.join("dQw4w9WgXcQ.m4a")
    }
}

#[async_trait]
impl MediaExtractor for StubExtractor {
    async fn extract(&self, _url: &str) -> Result<AudioArtifact, ExtractError> {
        if let Some(err) = &self.result {
            return Err(match err {
                ExtractError::UnsupportedSource(msg) => {
                    ExtractError::UnsupportedSource(msg.clone())
                }
                ExtractError::Network { attempts, reason } => ExtractError::Network {
                    attempts: *attempts,
                    reason: reason.clone(),
                },
                ExtractError::Extraction(msg) => ExtractError::Extraction(msg.clone()),
            });
        }

        let path = self.audio_path();
        std::fs::write(&path, b"fake-audio-bytes").expect("stub audio file is writable");
        Ok(AudioArtifact::new(path, 180))
    }
}

struct StubTranscriber {
    result: Result<String, TranscribeError>,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _artifact: &AudioArtifact) -> Result<String, TranscribeError> {
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(TranscribeError::TooLong { actual, limit }) => Err(TranscribeError::TooLong {
                actual: *actual,
                limit: *limit,
            }),
            Err(TranscribeError::EmptyAudio) => Err(TranscribeError::EmptyAudio),
            Err(TranscribeError::Failed(msg)) => Err(TranscribeError::Failed(msg.clone())),
        }
    }
}

struct StubSynthesizer {
    candidate: CandidateQuiz,
}

#[async_trait]
impl QuizSynthesizer for StubSynthesizer {
    async fn synthesize(&self, _transcript: &str) -> Result<CandidateQuiz, SynthesisError> {
        Ok(self.candidate.clone())
    }
}

struct InMemoryQuizRepository {
    quizzes: RwLock<Vec<Quiz>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: RwLock::new(Vec::new()),
        }
    }

    async fn len(&self) -> usize {
        self.quizzes.read().await.len()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn insert(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.quizzes.write().await.push(quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .iter()
            .filter(|q| q.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

fn build_service(
    extractor: StubExtractor,
    transcriber: StubTranscriber,
    synthesizer: StubSynthesizer,
    repository: Arc<InMemoryQuizRepository>,
) -> QuizService {
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        Arc::new(extractor),
        Arc::new(transcriber),
        Arc::new(synthesizer),
        repository.clone(),
        Duration::from_secs(5),
    ));

    QuizService::new(repository, orchestrator)
}

#[actix_web::test]
async fn test_url_to_stored_quiz_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = StubExtractor::succeeding(&dir);
    let audio_path = extractor.audio_path();

    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        extractor,
        StubTranscriber {
            result: Ok("a three minute talk about the borrow checker".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let created = service.create_from_url(VIDEO_URL, &owner).await.unwrap();

    assert_eq!(created.questions.len(), 10);
    for question in &created.questions {
        assert_eq!(question.options.len(), 4);
        assert!(question.answer_index < question.options.len());
    }

    // Stored quiz is visible through the detail view
    let fetched = service.get_quiz(&created.id, &owner).await.unwrap();
    assert_eq!(fetched.questions.len(), 10);
    assert_eq!(fetched.video_url, VIDEO_URL);

    // Temp audio artifact was released during the run
    assert!(!audio_path.exists());
}

#[actix_web::test]
async fn test_playlist_url_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        StubExtractor::succeeding(&dir),
        StubTranscriber {
            result: Ok("unused".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let result = service
        .create_from_url("https://www.youtube.com/playlist?list=PL1234567890", &owner)
        .await;

    assert!(matches!(result, Err(AppError::UnsupportedSource(_))));
    assert_eq!(repository.len().await, 0);
}

#[actix_web::test]
async fn test_invalid_candidate_creates_nothing_and_releases_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = StubExtractor::succeeding(&dir);
    let audio_path = extractor.audio_path();

    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        extractor,
        StubTranscriber {
            result: Ok("transcript".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(11),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let result = service.create_from_url(VIDEO_URL, &owner).await;

    assert!(matches!(result, Err(AppError::SchemaViolation(_))));
    assert_eq!(repository.len().await, 0);
    assert!(!audio_path.exists());
}

#[actix_web::test]
async fn test_oversized_audio_maps_to_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        StubExtractor::succeeding(&dir),
        StubTranscriber {
            result: Err(TranscribeError::TooLong {
                actual: 4000,
                limit: 1200,
            }),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let result = service.create_from_url(VIDEO_URL, &owner).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(repository.len().await, 0);
}

#[actix_web::test]
async fn test_quiz_access_is_scoped_to_owner() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        StubExtractor::succeeding(&dir),
        StubTranscriber {
            result: Ok("transcript".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let created = service.create_from_url(VIDEO_URL, &owner).await.unwrap();

    let stranger = claims_for("user-2");
    let result = service.get_quiz(&created.id, &stranger).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let result = service.get_quiz("no-such-id", &owner).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_list_views_do_not_leak_answers() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        StubExtractor::succeeding(&dir),
        StubTranscriber {
            result: Ok("transcript".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    service.create_from_url(VIDEO_URL, &owner).await.unwrap();

    let listed = service.list_quizzes(&owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].question_count, 10);

    let json = serde_json::to_string(&listed).unwrap();
    assert!(!json.contains("answer_index"));

    // A different user sees an empty list
    let other = service.list_quizzes(&claims_for("user-2")).await.unwrap();
    assert!(other.is_empty());
}

#[actix_web::test]
async fn test_network_exhaustion_maps_to_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let mut extractor = StubExtractor::succeeding(&dir);
    extractor.result = Some(ExtractError::Network {
        attempts: 3,
        reason: "connection reset".to_string(),
    });

    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = build_service(
        extractor,
        StubTranscriber {
            result: Ok("unused".to_string()),
        },
        StubSynthesizer {
            candidate: candidate_quiz(10),
        },
        repository.clone(),
    );

    let owner = claims_for("user-1");
    let result = service.create_from_url(VIDEO_URL, &owner).await;

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
    assert_eq!(repository.len().await, 0);
}

#[actix_web::test]
async fn test_stage_names_surface_in_failures() {
    // Direct orchestrator run so the typed failure is observable before the
    // HTTP mapping erases the stage
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(InMemoryQuizRepository::new());
    let orchestrator = PipelineOrchestrator::new(
        Arc::new(StubExtractor::succeeding(&dir)),
        Arc::new(StubTranscriber {
            result: Err(TranscribeError::Failed("decoder crashed".to_string())),
        }),
        Arc::new(StubSynthesizer {
            candidate: candidate_quiz(10),
        }),
        repository.clone(),
        Duration::from_secs(5),
    );

    let failure = orchestrator.run(VIDEO_URL, "user-1").await.unwrap_err();

    assert_eq!(failure.stage, Stage::Transcribing);
    assert!(matches!(
        failure.reason,
        StageError::Transcribe(TranscribeError::Failed(_))
    ));
    assert!(failure.to_string().contains("transcribing"));
}
