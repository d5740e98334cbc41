use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Quiz, QuizQuestion, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.subject(),
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Question as shown to the quiz owner: options plus the correct index.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub text: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

impl From<QuizQuestion> for QuestionDto {
    fn from(question: QuizQuestion) -> Self {
        QuestionDto {
            text: question.text,
            options: question.options,
            answer_index: question.answer_index,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDetailDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub questions: Vec<QuestionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Quiz> for QuizDetailDto {
    fn from(quiz: Quiz) -> Self {
        QuizDetailDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            video_url: quiz.video_url,
            questions: quiz.questions.into_iter().map(QuestionDto::from).collect(),
            created_at: quiz.created_at,
        }
    }
}

/// Listing entry; never exposes correct-answer indices.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummaryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Quiz> for QuizSummaryDto {
    fn from(quiz: Quiz) -> Self {
        QuizSummaryDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            video_url: quiz.video_url,
            question_count: quiz.questions.len(),
            created_at: quiz.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub detail: String,
}

impl MessageResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub detail: String,
    pub user: UserDto,
}
