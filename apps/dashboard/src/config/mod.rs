// Config module for amrt_dashboard
// Radar config documents and environment-derived settings

pub mod env;
pub mod radar;

pub use env::{init_app_config, DashboardSettings};
pub use radar::{load_config, ConfigError, RadarConfig};
