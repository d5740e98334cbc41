use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::password::hash_password,
    errors::{AppError, AppResult},
    models::{domain::User, dto::request::RegisterRequestDto, dto::response::UserDto},
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequestDto) -> AppResult<UserDto> {
        request.validate()?;

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "This username is already taken.".to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "This email is already taken.".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(&request.username, &request.email, &password_hash);
        let created = self.repository.create(user).await?;

        log::info!("Registered user {}", created.username);
        Ok(UserDto::from(created))
    }
}
