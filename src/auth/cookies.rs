use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::config::Config;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

fn samesite(config: &Config) -> SameSite {
    match config.cookie_samesite.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn build<'c>(config: &Config, name: &'c str, value: String, max_age: Duration) -> Cookie<'c> {
    let mut builder = Cookie::build(name, value)
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(samesite(config))
        .path("/")
        .max_age(max_age);

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.finish()
}

pub fn access_token_cookie(config: &Config, token: String, ttl_minutes: i64) -> Cookie<'static> {
    build(
        config,
        ACCESS_TOKEN_COOKIE,
        token,
        Duration::minutes(ttl_minutes),
    )
}

pub fn refresh_token_cookie(config: &Config, token: String, ttl_hours: i64) -> Cookie<'static> {
    build(
        config,
        REFRESH_TOKEN_COOKIE,
        token,
        Duration::hours(ttl_hours),
    )
}

/// An immediately-expiring replacement used to delete a token cookie.
pub fn expired_cookie(config: &Config, name: &'static str) -> Cookie<'static> {
    build(config, name, String::new(), Duration::ZERO)
}
