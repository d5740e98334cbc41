use async_openai::{
    config::OpenAIConfig,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use thiserror::Error;

use crate::pipeline::extractor::AudioArtifact;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("audio duration {actual}s exceeds the {limit}s limit")]
    TooLong { actual: u64, limit: u64 },

    #[error("audio artifact is empty")]
    EmptyAudio,

    #[error("transcription failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String, TranscribeError>;
}

/// Speech-to-text through the OpenAI transcription endpoint. Transcription
/// failures are treated as deterministic and are never retried.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
    max_duration_secs: u64,
}

impl WhisperTranscriber {
    pub fn new(client: Client<OpenAIConfig>, model: String, max_duration_secs: u64) -> Self {
        Self {
            client,
            model,
            max_duration_secs,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String, TranscribeError> {
        // Oversized input is rejected up front to bound cost and latency
        if artifact.duration_secs > self.max_duration_secs {
            return Err(TranscribeError::TooLong {
                actual: artifact.duration_secs,
                limit: self.max_duration_secs,
            });
        }

        let bytes = tokio::fs::read(artifact.path())
            .await
            .map_err(|e| TranscribeError::Failed(format!("could not read audio file: {}", e)))?;

        if bytes.is_empty() {
            return Err(TranscribeError::EmptyAudio);
        }

        let filename = artifact
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let request = CreateTranscriptionRequest {
            file: AudioInput::from_vec_u8(filename, bytes),
            model: self.model.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|e| TranscribeError::Failed(e.to_string()))?;

        let transcript = response.text.trim().to_string();
        if transcript.is_empty() {
            return Err(TranscribeError::Failed(
                "transcription produced no text".to_string(),
            ));
        }

        Ok(transcript)
    }
}
