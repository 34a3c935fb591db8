use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub stats_interval_secs: u64,
    pub payment_failure_rate: f64,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("LEARNHUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("learnhub")
            });

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let stats_interval_secs = std::env::var("LEARNHUB_STATS_INTERVAL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(5);

        let payment_failure_rate = std::env::var("LEARNHUB_PAYMENT_FAILURE_RATE")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|rate| (0.0..=1.0).contains(rate))
            .unwrap_or(0.1);

        Self {
            data_dir,
            log_level,
            stats_interval_secs,
            payment_failure_rate,
        }
    }

    /// Path of the JSON key-value file standing in for browser local storage.
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}
