
#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "testuser@example.com");
    }

    #[test]
    fn test_fixtures_candidate_quiz() {
        let quiz = candidate_quiz(10);
        assert_eq!(quiz.questions.len(), 10);

        // Options are distinct within and across questions
        for question in &quiz.questions {
            assert_eq!(question.question_options.len(), 4);
            assert!(question.question_options.contains(&question.answer));
        }
    }
}
