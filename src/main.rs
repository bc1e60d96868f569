// Audio API server
//
// Service entry point: loads configuration, wires the routes behind the
// authentication middleware, and runs the HTTP server.

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

use audio_api::config::{AppConfig, TranscriberConfig};
use audio_api::config_loader;
use audio_api::handlers::{duration, health, index, transcribe, Authentication};
use audio_api::transcriber::Transcriber;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Seed the environment from the optional config file before anything
    // reads it; this runs before logging is up, so it stays quiet
    config_loader::load_config();

    let config = AppConfig::default();
    let transcriber_config = TranscriberConfig::default();

    // Initialize logger; debug mode lowers the default filter
    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    // Create tmp directory if it doesn't exist
    if let Err(e) = config.ensure_temp_dir() {
        warn!("Failed to create temp directory {}: {}", config.temp_dir, e);
    }

    if config.api_key_hash.is_none() {
        warn!("API_KEY_HASH is not set; /duration and /transcribe will reject every request");
    }

    let transcriber = Transcriber::new(transcriber_config.clone());

    info!(
        "Starting audio API server on http://{}:{}",
        config.host, config.port
    );
    info!("Using temp directory: {}", config.temp_dir);
    info!("Transcription command: {}", transcriber_config.command_path);

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(transcriber.clone()))
            .service(index)
            .service(health)
            .service(
                web::scope("")
                    .wrap(Authentication::new(config.api_key_hash.clone()))
                    .service(duration)
                    .service(transcribe),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
