use serde::{Deserialize, Serialize};

/// Every generated question carries exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

impl QuizQuestion {
    pub fn answer(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }
}

/// Canonical form used to compare options for duplicates: lowercased with
/// runs of whitespace collapsed to a single space.
pub fn normalize_option(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
