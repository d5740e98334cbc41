pub mod quiz_service;
pub mod token_service;
pub mod user_service;

pub use quiz_service::QuizService;
pub use token_service::{TokenPair, TokenService};
pub use user_service::UserService;
