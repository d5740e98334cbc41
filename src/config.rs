use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_hours: i64,
    pub openai_api_key: SecretString,
    pub transcription_model: String,
    pub generation_model: String,
    pub cookie_domain: Option<String>,
    pub cookie_samesite: String,
    pub cookie_secure: bool,
    pub media_tmp_dir: PathBuf,
    pub max_audio_duration_secs: u64,
    pub upstream_retry_attempts: u32,
    pub stage_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizcast-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string()),
            ),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(15),
            refresh_token_ttl_hours: env::var("REFRESH_TOKEN_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(168),
            openai_api_key: SecretString::from(
                env::var("OPENAI_API_KEY").unwrap_or_else(|_| "openai_api_key".to_string()),
            ),
            transcription_model: env::var("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cookie_domain: env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
            cookie_samesite: env::var("COOKIE_SAMESITE").unwrap_or_else(|_| "Lax".to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            media_tmp_dir: env::var("MEDIA_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_audio_duration_secs: env::var("MAX_AUDIO_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1200),
            upstream_retry_attempts: env::var("UPSTREAM_RETRY_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            stage_timeout_secs: env::var("STAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();
        let openai_key = self.openai_api_key.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if openai_key == "openai_api_key" {
            panic!("FATAL: OPENAI_API_KEY is using default value! Set OPENAI_API_KEY environment variable.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizcast-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_hours: 1,
            openai_api_key: SecretString::from("test_openai_key".to_string()),
            transcription_model: "whisper-1".to_string(),
            generation_model: "gpt-4o-mini".to_string(),
            cookie_domain: None,
            cookie_samesite: "Lax".to_string(),
            cookie_secure: false,
            media_tmp_dir: std::env::temp_dir(),
            max_audio_duration_secs: 1200,
            upstream_retry_attempts: 3,
            stage_timeout_secs: 5,
        }
    }
}
