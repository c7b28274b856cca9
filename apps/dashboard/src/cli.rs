use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "amrt-dashboard", version, about = "AMRT storm radar dashboard")]
pub struct CliArgs {
    /// Run the simulation without a UI and print the board
    #[arg(long)]
    pub headless: bool,

    /// Print the headless board as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override radar config path
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Scans to run in headless mode
    #[arg(long, default_value_t = 100)]
    pub ticks: u64,

    /// Seed the noise generator for a reproducible storm
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.config {
            std::env::set_var("AMRT_CONFIG", path);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("AMRT_LOG_FILE", path);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
