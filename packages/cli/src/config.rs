// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Centralized definitions of every environment variable name Procura reads

use std::path::PathBuf;

// Port Configuration
pub const PROCURA_PORT: &str = "PROCURA_PORT";

// Database Configuration
pub const PROCURA_DATABASE_PATH: &str = "PROCURA_DATABASE_PATH";

// CORS Configuration
pub const PROCURA_CORS_ORIGIN: &str = "PROCURA_CORS_ORIGIN";

// Authentication
pub const PROCURA_AUTH_SECRET: &str = "PROCURA_AUTH_SECRET";
pub const PROCURA_SESSION_TTL_SECS: &str = "PROCURA_SESSION_TTL_SECS";
pub const PROCURA_RESET_TTL_SECS: &str = "PROCURA_RESET_TTL_SECS";

// Frontend links embedded in emails
pub const PROCURA_FRONTEND_URL: &str = "PROCURA_FRONTEND_URL";

// Outbound mail
pub const PROCURA_MAIL_ENDPOINT: &str = "PROCURA_MAIL_ENDPOINT";
pub const PROCURA_MAIL_FROM: &str = "PROCURA_MAIL_FROM";
pub const PROCURA_OUTBOX_POLL_SECS: &str = "PROCURA_OUTBOX_POLL_SECS";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
    pub auth_secret: String,
    pub session_ttl_secs: i64,
    pub reset_ttl_secs: i64,
    pub frontend_url: String,
    pub mail_endpoint: Option<String>,
    pub mail_from: String,
    pub outbox_poll_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = read_parsed(PROCURA_PORT, 4187u16)?;
        let database_path = std::env::var(PROCURA_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("procura.db"));
        let cors_origin = std::env::var(PROCURA_CORS_ORIGIN)
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        // No default: a guessable signing secret would make every session forgeable
        let auth_secret = std::env::var(PROCURA_AUTH_SECRET)
            .map_err(|_| anyhow::anyhow!("{} must be set", PROCURA_AUTH_SECRET))?;

        let session_ttl_secs = read_parsed(
            PROCURA_SESSION_TTL_SECS,
            procura_auth::session::SESSION_TTL_SECS,
        )?;
        let reset_ttl_secs = read_parsed(PROCURA_RESET_TTL_SECS, procura_auth::RESET_TOKEN_TTL_SECS)?;

        let frontend_url = std::env::var(PROCURA_FRONTEND_URL)
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let mail_endpoint = std::env::var(PROCURA_MAIL_ENDPOINT).ok();
        let mail_from = std::env::var(PROCURA_MAIL_FROM)
            .unwrap_or_else(|_| "no-reply@procura.local".to_string());
        let outbox_poll_secs = read_parsed(PROCURA_OUTBOX_POLL_SECS, 15u64)?;

        Ok(Self {
            port,
            database_path,
            cors_origin,
            auth_secret,
            session_ttl_secs,
            reset_ttl_secs,
            frontend_url,
            mail_endpoint,
            mail_from,
            outbox_poll_secs,
        })
    }
}

fn read_parsed<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}
