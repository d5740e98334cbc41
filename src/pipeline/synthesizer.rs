use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::{
    constants::quiz_prompt::{quiz_user_prompt, QUIZ_SYSTEM_PROMPT},
    models::domain::QUESTIONS_PER_QUIZ,
    pipeline::candidate::CandidateQuiz,
};

static CANDIDATE_SCHEMA_JSON: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(CandidateQuiz);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
});

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("quiz generation request failed: {0}")]
    Generation(String),

    #[error("model returned a malformed quiz payload: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait QuizSynthesizer: Send + Sync {
    async fn synthesize(&self, transcript: &str) -> Result<CandidateQuiz, SynthesisError>;
}

/// Generates a candidate quiz from a transcript via one chat completion.
/// Each call rebuilds the same prompt from the same transcript, so a
/// re-prompt after a malformed response is deterministic. Transport and
/// quota failures are retried with bounded exponential backoff; malformed
/// payloads are not (the orchestrator owns the single re-prompt).
pub struct OpenAiQuizSynthesizer {
    client: Client<OpenAIConfig>,
    model: String,
    max_attempts: u32,
    backoff_base: Duration,
}

impl OpenAiQuizSynthesizer {
    pub fn new(client: Client<OpenAIConfig>, model: String, max_attempts: u32) -> Self {
        Self {
            client,
            model,
            max_attempts: max_attempts.max(1),
            backoff_base: Duration::from_secs(1),
        }
    }

    async fn complete_once(&self, transcript: &str) -> Result<String, SynthesisError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(QUIZ_SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| SynthesisError::Generation(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(quiz_user_prompt(
                        transcript,
                        QUESTIONS_PER_QUIZ,
                        &CANDIDATE_SCHEMA_JSON,
                    ))
                    .build()
                    .map_err(|e| SynthesisError::Generation(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.2)
            .build()
            .map_err(|e| SynthesisError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SynthesisError::Generation(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                SynthesisError::MalformedResponse("completion contained no content".to_string())
            })
    }
}

/// Salvage the JSON object from a raw completion: drop markdown fences and
/// any prose around the outermost braces. Anything that still fails to parse
/// is a protocol violation, not a quiz-validation error.
pub(crate) fn extract_json_object(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if text.contains("```") {
        let parts: Vec<&str> = text.split("```").collect();
        if parts.len() >= 2 {
            text = parts[1]
                .lines()
                .filter(|line| line.trim().to_lowercase() != "json")
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    if !text.trim_start().starts_with('{') {
        if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
            if start < end {
                text = text[start..=end].to_string();
            }
        }
    }

    text
}

#[async_trait]
impl QuizSynthesizer for OpenAiQuizSynthesizer {
    async fn synthesize(&self, transcript: &str) -> Result<CandidateQuiz, SynthesisError> {
        let mut attempt = 0;
        let text = loop {
            attempt += 1;
            match self.complete_once(transcript).await {
                Ok(content) => break content,
                Err(err @ SynthesisError::MalformedResponse(_)) => return Err(err),
                Err(SynthesisError::Generation(reason)) => {
                    if attempt >= self.max_attempts {
                        return Err(SynthesisError::Generation(reason));
                    }
                    log::warn!(
                        "Quiz generation request failed (attempt {}/{}): {}",
                        attempt,
                        self.max_attempts,
                        reason
                    );
                    tokio::time::sleep(self.backoff_base * 2u32.pow(attempt - 1)).await;
                }
            }
        };

        let json = extract_json_object(&text);
        serde_json::from_str::<CandidateQuiz>(&json)
            .map_err(|e| SynthesisError::MalformedResponse(e.to_string()))
    }
}
