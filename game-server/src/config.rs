use std::env;
use std::str::FromStr;
use tracing::warn;

use game_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub words_file: Option<String>,
    pub high_scores_max: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            words_file: env::var("WORDS_FILE").ok().filter(|path| !path.is_empty()),
            high_scores_max: parse_or("HIGH_SCORES_MAX", 100),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {}='{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
