use crate::app::actions::AppActions;
use amrt_dashboard::config::{DashboardSettings, RadarConfig};
use amrt_dashboard::display::{publish_config, publish_tick, DisplayBoard};
use amrt_dashboard::sim::{SimEvent, SimState, FIRE_TOLERANCE, SCAN_INTERVAL};
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Longest stretch of wall-clock time replayed in one frame. Anything beyond
/// it (a suspended terminal, a debugger pause) is dropped.
const MAX_CATCH_UP: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub actions: AppActions,
    pub config: Option<RadarConfig>,
    pub sim: Option<SimState>,
    pub board: DisplayBoard,
    pub status_message: String,
    pub load_error: Option<String>,
    pub reload_requested: bool,
    pub show_help: bool,
    pub paused: bool,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub last_scan: Option<DateTime<Local>>,
    scan_backlog: f64,
    rng: StdRng,
}

impl App {
    pub fn new(settings: &DashboardSettings, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self {
            running: true,
            actions: AppActions::new(settings),
            config: None,
            sim: None,
            board: DisplayBoard::new(),
            status_message: String::new(),
            load_error: None,
            reload_requested: true,
            show_help: false,
            paused: false,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            last_scan: None,
            scan_backlog: 0.0,
            rng,
        }
    }

    /// Replaces the running storm with one seeded from `config`, resetting
    /// every timer and the velocity history.
    pub fn apply_config(&mut self, config: RadarConfig) {
        match self.sim.as_mut() {
            Some(sim) => sim.reset(&config),
            None => self.sim = Some(SimState::new(&config)),
        }

        self.board.clear();
        publish_config(&config, &mut self.board);
        self.config = Some(config);
        self.load_error = None;
        self.scan_backlog = 0.0;
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.advance_clock(delta);
    }

    /// Moves animations forward by `delta` and runs however many scan ticks
    /// fit into the elapsed time. Returns the number of ticks run.
    pub fn advance_clock(&mut self, delta: Duration) -> usize {
        let delta = delta.min(MAX_CATCH_UP).as_secs_f64();

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.paused || self.sim.is_none() {
            return 0;
        }

        self.scan_backlog += delta;
        let mut ticks = 0;
        while self.scan_backlog >= SCAN_INTERVAL - FIRE_TOLERANCE {
            self.scan_backlog = (self.scan_backlog - SCAN_INTERVAL).max(0.0);
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Runs a single scan tick and publishes its results to the board.
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let Some(sim) = self.sim.as_ref() else {
            return Vec::new();
        };

        let (next, events) = sim.advance(SCAN_INTERVAL, &mut self.rng);
        publish_tick(&next, &events, &mut self.board);
        for event in &events {
            tracing::debug!(tick = next.ticks(), ?event, "scan event");
        }

        self.sim = Some(next);
        self.last_scan = Some(Local::now());
        events
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.status_message = if self.paused {
            "Simulation paused".to_string()
        } else {
            "Simulation resumed".to_string()
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Fraction of the current sweep, used to drive the radar animation.
    pub fn sweep_phase(&self) -> f64 {
        self.sim.as_ref().map_or(0.0, SimState::rotation_phase)
    }
}
