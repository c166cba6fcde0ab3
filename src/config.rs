use std::env;

use tracing::warn;

use crate::utils::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

pub const MAX_VALIDITY_MINUTES: i64 = 10080;
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;
pub const MAX_BATCH_SIZE: usize = 5;

/// Process configuration, read once from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage_backend: String,
    pub urls_file: String,
    pub random_code_length: usize,
    pub default_validity_minutes: i64,
    pub click_flush_interval_secs: u64,
    pub environment: String,
    pub default_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let random_code_length = parse_env("RANDOM_CODE_LENGTH", 6usize);
        let random_code_length = if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&random_code_length) {
            warn!(
                "RANDOM_CODE_LENGTH {} outside {}-{}, using 6",
                random_code_length, MIN_CODE_LENGTH, MAX_CODE_LENGTH
            );
            6
        } else {
            random_code_length
        };

        let default_validity_minutes =
            parse_env("DEFAULT_VALIDITY_MINUTES", DEFAULT_VALIDITY_MINUTES);
        let default_validity_minutes = if !(1..=MAX_VALIDITY_MINUTES).contains(&default_validity_minutes) {
            warn!(
                "DEFAULT_VALIDITY_MINUTES {} outside 1-{}, using {}",
                default_validity_minutes, MAX_VALIDITY_MINUTES, DEFAULT_VALIDITY_MINUTES
            );
            DEFAULT_VALIDITY_MINUTES
        } else {
            default_validity_minutes
        };

        Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_env("SERVER_PORT", 8080u16),
            storage_backend: env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
            urls_file: env::var("URLS_FILE").unwrap_or_else(|_| "urls.json".to_string()),
            random_code_length,
            default_validity_minutes,
            click_flush_interval_secs: parse_env("CLICK_FLUSH_INTERVAL_SECS", 10u64),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            default_url: env::var("DEFAULT_URL")
                .unwrap_or_else(|_| "https://example.com".to_string()),
        }
    }
}

fn parse_env<T: std::str::FromStr + std::fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
