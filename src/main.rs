use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use storefront_service::config::AppConfig;
use storefront_service::domain::ports::Notifier;
use storefront_service::infrastructure::fcm::{FcmNotifier, LogNotifier};
use storefront_service::infrastructure::token_verifier::JwtTokenVerifier;
use storefront_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let verifier = Arc::new(JwtTokenVerifier::from_config(&config.auth)?);
    let notifier: Arc<dyn Notifier> = match config.fcm.clone() {
        Some(fcm) => Arc::new(FcmNotifier::new(fcm)),
        None => {
            log::warn!("FCM_SERVER_KEY not set, push notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState::new(pool, &config, verifier, notifier);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
