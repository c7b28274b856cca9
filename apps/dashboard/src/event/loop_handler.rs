use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt;
use std::io::Stdout;
use std::path::PathBuf;

use crate::app::{handle_input, App};
use crate::ui;
use amrt_dashboard::display::DisplayField;

// States of a config fetch
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ConfigLoadState {
    Idle,
    Loading,
    Applied,
    Failed,
}

impl fmt::Display for ConfigLoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Applied => write!(f, "Applied"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
enum ConfigLoadEvent {
    Start,
    Applied(PathBuf),
    Failed(String),
    Reset,
}

impl fmt::Display for ConfigLoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Applied(path) => write!(f, "Applied({path})", path = path.display()),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: ConfigLoadState,
    event: ConfigLoadEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct ConfigLoadMachine {
    state: ConfigLoadState,
}

impl ConfigLoadMachine {
    const fn new(initial_state: ConfigLoadState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> ConfigLoadState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &ConfigLoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(ConfigLoadState);

impl NextState {
    const fn new(state: ConfigLoadState) -> Self {
        Self(state)
    }
}

impl ConfigLoadState {
    const fn next_state(self) -> NextState {
        NextState::new(self)
    }
}

impl TryFrom<(ConfigLoadState, &ConfigLoadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (ConfigLoadState, &ConfigLoadEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (ConfigLoadState::Idle, ConfigLoadEvent::Start) => {
                app.status_message = "Loading radar config...".to_string();
                Ok(ConfigLoadState::Loading.next_state())
            }
            (ConfigLoadState::Loading, ConfigLoadEvent::Applied(path)) => {
                let filename = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("config");

                app.status_message = format!("Config loaded: {filename}");
                app.reload_requested = false;
                Ok(ConfigLoadState::Applied.next_state())
            }
            (ConfigLoadState::Loading, ConfigLoadEvent::Failed(error)) => {
                app.status_message = if app.sim.is_some() {
                    format!("Reload failed, keeping current storm: {error}")
                } else {
                    format!("Error: {error}")
                };
                app.load_error = Some(error.clone());
                app.reload_requested = false;
                Ok(ConfigLoadState::Failed.next_state())
            }
            (ConfigLoadState::Applied | ConfigLoadState::Failed, ConfigLoadEvent::Reset) => {
                Ok(ConfigLoadState::Idle.next_state())
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Fetches the radar config and applies it, leaving the machine idle again.
fn reload_config(machine: &mut ConfigLoadMachine, app: &mut App) {
    if machine.state() != ConfigLoadState::Idle {
        return;
    }

    if let Err(e) = machine.process_event(&ConfigLoadEvent::Start, app) {
        tracing::warn!(error = %e, "config load did not start");
        return;
    }

    let event = match app.actions.fetch_config() {
        Ok(config) => {
            app.apply_config(config);
            ConfigLoadEvent::Applied(app.actions.config_path().to_path_buf())
        }
        Err(e) => {
            tracing::error!(error = %e, "radar config fetch failed");
            ConfigLoadEvent::Failed(e.to_string())
        }
    };

    if let Err(e) = machine.process_event(&event, app) {
        tracing::warn!(error = %e, "config load transition rejected");
    }

    if let Err(e) = machine.process_event(&ConfigLoadEvent::Reset, app) {
        tracing::warn!(error = %e, "config load reset rejected");
    }
}

/// Run the simulation without a UI for `ticks` scans and print the board
pub fn run_headless(app: &mut App, ticks: u64, json: bool) -> Result<()> {
    let mut machine = ConfigLoadMachine::new(ConfigLoadState::Idle);
    reload_config(&mut machine, app);

    if let Some(error) = app.load_error.take() {
        return Err(color_eyre::eyre::eyre!("Could not load radar config: {error}"));
    }

    for _ in 0..ticks {
        app.tick();
    }

    tracing::info!(ticks, "headless run complete");

    if json {
        render_headless_json(app)?;
    } else {
        render_headless_stats(app);
    }

    Ok(())
}

fn render_headless_stats(app: &App) {
    let ticks = app.sim.as_ref().map_or(0, |sim| sim.ticks());

    println!("\nAMRT Storm Radar");
    println!("================");
    println!("Scans run: {ticks}");

    println!("\nStorm:");
    for field in [
        DisplayField::RadarVehicle,
        DisplayField::RotationSpeed,
        DisplayField::StormDirection,
        DisplayField::StormSpeed,
        DisplayField::HookEcho,
        DisplayField::Mesocyclone,
        DisplayField::Degraded,
        DisplayField::Alerts,
    ] {
        println!("- {}: {}", field.label(), app.board.get(field));
    }

    println!("\nVelocity & Couplet:");
    for field in [
        DisplayField::Inbound,
        DisplayField::Outbound,
        DisplayField::CoupletSize,
        DisplayField::CoupletStatus,
    ] {
        println!("- {}: {}", field.label(), app.board.get(field));
    }

    println!("\nReflectivity:");
    for field in [
        DisplayField::Reflectivity,
        DisplayField::HighCore,
        DisplayField::HailCore,
        DisplayField::Precipitation,
        DisplayField::Confidence,
        DisplayField::EfRating,
    ] {
        println!("- {}: {}", field.label(), app.board.get(field));
    }
}

fn render_headless_json(app: &App) -> Result<()> {
    let json = serde_json::to_string_pretty(&app.board.to_json())?;
    println!("{json}");
    Ok(())
}

/// Run the main application event loop
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut machine = ConfigLoadMachine::new(ConfigLoadState::Idle);

    loop {
        if app.reload_requested {
            reload_config(&mut machine, app);
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        tracing::debug!("redraw after resize failed");
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }
    }
    Ok(())
}
