use std::collections::HashSet;

use thiserror::Error;

use crate::{
    models::domain::{
        quiz_question::normalize_option, Quiz, QuizQuestion, OPTIONS_PER_QUESTION,
        QUESTIONS_PER_QUIZ,
    },
    pipeline::candidate::CandidateQuiz,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("expected exactly {expected} questions, got {actual}")]
    QuestionCount { expected: usize, actual: usize },

    #[error("question {index} has {actual} options, expected exactly {expected}")]
    OptionCount {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("question {index}: the answer is not one of its options")]
    AnswerNotInOptions { index: usize },

    #[error("question {index} has duplicate options")]
    DuplicateOptions { index: usize },
}

/// A candidate that has passed every structural check. Only `validate` can
/// construct one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidQuiz(CandidateQuiz);

impl ValidQuiz {
    pub fn title(&self) -> &str {
        &self.0.title
    }

    pub fn into_quiz(self, owner_id: &str, video_url: &str) -> Quiz {
        let questions = self
            .0
            .questions
            .into_iter()
            .map(|q| {
                // Position of the answer is validated to exist
                let answer_index = q
                    .question_options
                    .iter()
                    .position(|opt| opt == &q.answer)
                    .unwrap_or(0);
                QuizQuestion {
                    text: q.question_title,
                    options: q.question_options,
                    answer_index,
                }
            })
            .collect();

        Quiz::new(owner_id, &self.0.title, &self.0.description, video_url, questions)
    }
}

/// Structural enforcement, pure and deterministic: question count, then
/// option counts, then answer membership, then option uniqueness,
/// short-circuiting on the first violation. A violation always discards the
/// candidate; nothing is repaired in place.
pub fn validate(candidate: CandidateQuiz) -> Result<ValidQuiz, SchemaViolation> {
    if candidate.questions.len() != QUESTIONS_PER_QUIZ {
        return Err(SchemaViolation::QuestionCount {
            expected: QUESTIONS_PER_QUIZ,
            actual: candidate.questions.len(),
        });
    }

    for (index, question) in candidate.questions.iter().enumerate() {
        if question.question_options.len() != OPTIONS_PER_QUESTION {
            return Err(SchemaViolation::OptionCount {
                index,
                expected: OPTIONS_PER_QUESTION,
                actual: question.question_options.len(),
            });
        }
    }

    for (index, question) in candidate.questions.iter().enumerate() {
        if !question
            .question_options
            .iter()
            .any(|opt| opt == &question.answer)
        {
            return Err(SchemaViolation::AnswerNotInOptions { index });
        }
    }

    for (index, question) in candidate.questions.iter().enumerate() {
        let normalized: HashSet<String> = question
            .question_options
            .iter()
            .map(|opt| normalize_option(opt))
            .collect();
        if normalized.len() != question.question_options.len() {
            return Err(SchemaViolation::DuplicateOptions { index });
        }
    }

    Ok(ValidQuiz(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{candidate_question, candidate_quiz};

    #[test]
    fn test_well_formed_candidate_passes() {
        let candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        let valid = validate(candidate).unwrap();

        let quiz = valid.into_quiz("user-1", "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(quiz.questions.len(), QUESTIONS_PER_QUIZ);
        for question in &quiz.questions {
            assert_eq!(question.options.len(), OPTIONS_PER_QUESTION);
            assert!(question.answer().is_some());
        }
    }

    #[test]
    fn test_nine_questions_rejected() {
        let candidate = candidate_quiz(9);
        assert_eq!(
            validate(candidate),
            Err(SchemaViolation::QuestionCount {
                expected: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_eleven_questions_rejected() {
        let candidate = candidate_quiz(11);
        assert_eq!(
            validate(candidate),
            Err(SchemaViolation::QuestionCount {
                expected: 10,
                actual: 11
            })
        );
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let mut candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        candidate.questions[3].question_options.pop();

        assert_eq!(
            validate(candidate),
            Err(SchemaViolation::OptionCount {
                index: 3,
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_answer_missing_from_options_rejected() {
        let mut candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        candidate.questions[5].answer = "never offered".to_string();

        assert_eq!(
            validate(candidate),
            Err(SchemaViolation::AnswerNotInOptions { index: 5 })
        );
    }

    #[test]
    fn test_duplicate_options_rejected_after_normalization() {
        let mut candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        // Differs from option 0 only by case and spacing
        let shadow = format!("  {}  ", candidate.questions[7].question_options[0].to_uppercase());
        candidate.questions[7].question_options[3] = shadow;

        assert_eq!(
            validate(candidate),
            Err(SchemaViolation::DuplicateOptions { index: 7 })
        );
    }

    #[test]
    fn test_option_count_reported_before_answer_membership() {
        // Question 2 has both a short options list and a foreign answer; the
        // option-count pass runs first
        let mut candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        candidate.questions[2].question_options.pop();
        candidate.questions[2].answer = "never offered".to_string();

        assert!(matches!(
            validate(candidate),
            Err(SchemaViolation::OptionCount { index: 2, .. })
        ));
    }

    #[test]
    fn test_into_quiz_maps_answer_index() {
        let mut candidate = candidate_quiz(QUESTIONS_PER_QUIZ);
        candidate.questions[0].answer = candidate.questions[0].question_options[2].clone();

        let valid = validate(candidate).unwrap();
        let quiz = valid.into_quiz("user-1", "https://www.youtube.com/watch?v=dQw4w9WgXcQ");

        assert_eq!(quiz.questions[0].answer_index, 2);
    }

    #[test]
    fn test_single_question_fixture_shape() {
        let question = candidate_question(0);
        assert_eq!(question.question_options.len(), OPTIONS_PER_QUESTION);
        assert!(question.question_options.contains(&question.answer));
    }
}
