use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizcast_server::{
    app_state::AppState,
    auth::AuthMiddleware,
    config::Config,
    handlers::{
        create_quiz, get_quiz, health_check, health_check_live, health_check_ready, list_quizzes,
        login, logout, refresh_token, register,
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if !cfg!(debug_assertions) {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(health_check)
            .service(health_check_live)
            .service(health_check_ready)
            .service(register)
            .service(login)
            .service(refresh_token)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(logout)
                    .service(create_quiz)
                    .service(list_quizzes)
                    .service(get_quiz),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
