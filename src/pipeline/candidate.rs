use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quiz structure exactly as the generative service returns it, prior to any
/// schema enforcement. Field names are part of the prompt contract.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CandidateQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<CandidateQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CandidateQuestion {
    pub question_title: String,
    pub question_options: Vec<String>,
    /// The correct answer, verbatim; must be one of `question_options`.
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_parses_contract_shape() {
        let raw = r#"{
            "title": "Sample",
            "description": "About a video",
            "questions": [
                {
                    "question_title": "What color is the sky?",
                    "question_options": ["Blue", "Green", "Red", "Yellow"],
                    "answer": "Blue"
                }
            ]
        }"#;

        let candidate: CandidateQuiz = serde_json::from_str(raw).unwrap();
        assert_eq!(candidate.questions.len(), 1);
        assert_eq!(candidate.questions[0].answer, "Blue");
    }

    #[test]
    fn test_candidate_rejects_unknown_fields() {
        let raw = r#"{
            "title": "Sample",
            "description": "About a video",
            "questions": [],
            "extra": true
        }"#;

        assert!(serde_json::from_str::<CandidateQuiz>(raw).is_err());
    }

    #[test]
    fn test_candidate_rejects_missing_fields() {
        let raw = r#"{ "title": "Sample", "questions": [] }"#;

        assert!(serde_json::from_str::<CandidateQuiz>(raw).is_err());
    }
}
