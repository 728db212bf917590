use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // API configuration
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,

    // Session persistence
    pub session_file: PathBuf,

    // Content settings
    pub max_post_length: usize,
    pub max_comment_length: usize,
    pub max_nesting_level: usize,

    // Bot reconciliation
    pub reconcile_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            api_base_url: env::var("SHAMSTAGRAM_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            request_timeout_secs: env::var("SHAMSTAGRAM_REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            session_file: env::var("SHAMSTAGRAM_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".shamstagram/session.json")),

            max_post_length: env::var("MAX_POST_LENGTH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            max_nesting_level: env::var("MAX_NESTING_LEVEL")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,

            reconcile_delay_ms: env::var("RECONCILE_DELAY_MS")
                .unwrap_or_else(|_| "1500".to_string())
                .parse()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            session_file: PathBuf::from(".shamstagram/session.json"),
            max_post_length: 500,
            max_comment_length: 500,
            max_nesting_level: 2,
            reconcile_delay_ms: 1500,
        }
    }
}
