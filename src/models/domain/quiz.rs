use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_question::QuizQuestion;

/// Every persisted quiz carries exactly this many questions; enforced by the
/// pipeline validator before anything reaches the repository.
pub const QUESTIONS_PER_QUIZ: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        owner_id: &str,
        title: &str,
        description: &str,
        video_url: &str,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            video_url: video_url.to_string(),
            questions,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_creation() {
        let quiz = Quiz::new(
            "user-1",
            "Sample quiz",
            "A quiz about nothing",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            vec![],
        );

        assert_eq!(quiz.owner_id, "user-1");
        assert_eq!(quiz.title, "Sample quiz");
        assert!(quiz.created_at.is_some());
        assert!(!quiz.id.is_empty());
    }
}
