pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;

pub use auth_handler::{login, logout, refresh_token, register};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{create_quiz, get_quiz, list_quizzes};
