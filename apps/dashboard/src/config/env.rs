use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Where the dashboard reads its config from and where it logs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub config_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

/// Initializes the application configuration from `.env` and the process
/// environment
pub fn init_app_config() -> DashboardSettings {
    // Load environment variables from .env file
    dotenv().ok();

    DashboardSettings {
        config_path: get_config_path(),
        log_file: env::var("AMRT_LOG_FILE").ok().map(PathBuf::from),
    }
}

/// Gets the path of the radar config document
pub fn get_config_path() -> PathBuf {
    env::var("AMRT_CONFIG").map_or_else(|_| PathBuf::from("config.json"), PathBuf::from)
}
