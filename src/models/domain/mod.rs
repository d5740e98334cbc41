pub mod quiz;
pub mod quiz_question;
pub mod refresh_token;
pub mod user;

pub use quiz::{Quiz, QUESTIONS_PER_QUIZ};
pub use quiz_question::{QuizQuestion, OPTIONS_PER_QUESTION};
pub use refresh_token::RefreshTokenRecord;
pub use user::User;
