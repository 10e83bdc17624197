use std::sync::Arc;
use tokio::signal;
use tracing::info;

use game_core::{WordList, WordSource};
use game_persistence::{Store, connection::connect_and_migrate};
use game_server::{config::Config, create_routes, game_service::GameService};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hangman server...");

    let config = Config::new();

    let word_source: Arc<dyn WordSource> = match &config.words_file {
        Some(path) => match WordList::from_file(path) {
            Ok(words) => {
                info!("Loaded {} words from {}", words.len(), path);
                Arc::new(words)
            }
            Err(e) => {
                tracing::error!("Failed to load words from '{}': {:#}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            info!("WORDS_FILE not set, using the built-in word list");
            Arc::new(WordList::builtin())
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(GameService::new(Store::new(db), word_source));
    let routes = create_routes(service, config.high_scores_max);

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((host, config.port), async {
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!("Server started on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}
