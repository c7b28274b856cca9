use amrt_dashboard::config::{load_config, ConfigError, DashboardSettings, RadarConfig};
use std::path::{Path, PathBuf};

/// Side-effecting operations the dashboard performs outside the simulation
#[derive(Debug, Clone)]
pub struct AppActions {
    pub config_path: PathBuf,
}

impl AppActions {
    pub fn new(settings: &DashboardSettings) -> Self {
        Self {
            config_path: settings.config_path.clone(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the radar config document from disk.
    pub fn fetch_config(&self) -> Result<RadarConfig, ConfigError> {
        tracing::info!(path = %self.config_path.display(), "fetching radar config");
        load_config(&self.config_path)
    }
}
