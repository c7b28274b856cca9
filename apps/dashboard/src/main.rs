mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use amrt_dashboard::config::{init_app_config, DashboardSettings};
use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let settings = init_app_config();

    let headless = args.headless || !is_terminal();
    setup_tracing(&args, &settings, headless)?;
    tracing::info!(
        config = %settings.config_path.display(),
        headless,
        "starting AMRT dashboard"
    );

    let mut app = App::new(&settings, args.seed);

    if headless {
        return event::run_headless(&mut app, args.ticks, args.json);
    }

    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app);

    terminal::cleanup_terminal_state(true, true);

    result
}

/// Headless runs log to stderr. The TUI owns the screen, so it only logs when
/// a log file is configured, one JSON object per line.
fn setup_tracing(args: &CliArgs, settings: &DashboardSettings, headless: bool) -> Result<()> {
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if let Some(path) = settings.log_file.as_ref() {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
