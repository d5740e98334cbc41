pub mod candidate;
pub mod extractor;
pub mod orchestrator;
pub mod synthesizer;
pub mod transcriber;
pub mod validator;

pub use candidate::{CandidateQuestion, CandidateQuiz};
pub use extractor::{AudioArtifact, ExtractError, MediaExtractor, YtDlpExtractor};
pub use orchestrator::{PipelineFailure, PipelineOrchestrator, Stage, StageError};
pub use synthesizer::{OpenAiQuizSynthesizer, QuizSynthesizer, SynthesisError};
pub use transcriber::{TranscribeError, Transcriber, WhisperTranscriber};
pub use validator::{validate, SchemaViolation, ValidQuiz};
