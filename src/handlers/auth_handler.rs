use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::cookies::{
        access_token_cookie, expired_cookie, refresh_token_cookie, ACCESS_TOKEN_COOKIE,
        REFRESH_TOKEN_COOKIE,
    },
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{LoginRequestDto, RegisterRequestDto},
        response::{LoginResponse, MessageResponse, UserDto},
    },
};

#[post("/api/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequestDto>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[post("/api/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let (user, pair) = state
        .token_service
        .login(&request.username, &request.password)
        .await?;

    let config = &state.config;
    let access = access_token_cookie(
        config,
        pair.access_token,
        state.jwt_service.access_ttl_minutes(),
    );
    let refresh = refresh_token_cookie(
        config,
        pair.refresh_token,
        state.jwt_service.refresh_ttl_hours(),
    );

    Ok(HttpResponse::Ok().cookie(access).cookie(refresh).json(
        LoginResponse {
            detail: "Login successful".to_string(),
            user: UserDto::from(user),
        },
    ))
}

#[post("/api/token/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let presented = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::TokenInvalid("missing refresh token cookie".to_string()))?;

    let pair = state.token_service.refresh(&presented).await?;

    let config = &state.config;
    let access = access_token_cookie(
        config,
        pair.access_token,
        state.jwt_service.access_ttl_minutes(),
    );
    let refresh = refresh_token_cookie(
        config,
        pair.refresh_token,
        state.jwt_service.refresh_ttl_hours(),
    );

    Ok(HttpResponse::Ok()
        .cookie(access)
        .cookie(refresh)
        .json(MessageResponse::new("Token refreshed")))
}

#[post("/api/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(REFRESH_TOKEN_COOKIE) {
        state.token_service.logout(cookie.value()).await?;
    }

    let config = &state.config;
    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(config, ACCESS_TOKEN_COOKIE))
        .cookie(expired_cookie(config, REFRESH_TOKEN_COOKIE))
        .json(MessageResponse::new(
            "Logged out. Refresh token is now invalid.",
        )))
}
