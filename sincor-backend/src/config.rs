use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub artifacts_dir: String,
    pub heartbeat_interval_minutes: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/sincor.db".to_string()),
            artifacts_dir: env::var("ARTIFACTS_DIR")
                .unwrap_or_else(|_| "./.data/artifacts".to_string()),
            heartbeat_interval_minutes: env::var("HEARTBEAT_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("HEARTBEAT_INTERVAL_MINUTES must be a valid number"),
        }
    }
}
