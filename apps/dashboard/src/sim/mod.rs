// Simulation module for amrt_dashboard
// Storm state advanced on a fixed scan tick

pub mod history;
pub mod metrics;
pub mod timer;

pub use history::{VelocityHistory, HISTORY_CAPACITY};
pub use metrics::ReflectivityMetrics;
pub use timer::{Countdown, FIRE_TOLERANCE};

use crate::config::RadarConfig;
use crate::domain::{CoupletStatus, VelocityDirection};
use rand::Rng;

/// Simulated seconds covered by one scan tick
pub const SCAN_INTERVAL: f64 = 0.1;

const VELOCITY_STEP: f64 = 0.5;
const VELOCITY_SPAN: f64 = 10.0;
const VELOCITY_UPDATE_ROTATIONS: f64 = 2.0;
const COUPLET_SIZE_ROTATIONS: f64 = 2.0;
const COUPLET_STATUS_ROTATIONS: f64 = 6.0;
const COUPLET_SIZE_SCALE: f64 = 0.01;
const COUPLET_SIZE_CAP: f64 = 1.5;
const COUPLET_SIZE_NOISE: f64 = 0.1;
const REFLECTIVITY_NOISE: f64 = 5.0;

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    VelocityUpdated { inbound: f64, outbound: f64 },
    DirectionFlipped(VelocityDirection),
    CoupletSizeUpdated(f64),
    HistorySampled { sample: f64, evicted: Option<f64> },
    CoupletStatusUpdated(CoupletStatus),
    /// The couplet-status timer fired with too little history to classify.
    CoupletStatusSkipped { samples: usize },
}

#[derive(Debug, Clone)]
pub struct SimState {
    rotation_speed: f64,
    true_velocity: f64,
    inbound_velocity: f64,
    outbound_velocity: f64,
    direction: VelocityDirection,
    rotation_timer: f64,
    velocity_timer: Countdown,
    couplet_size_timer: Countdown,
    couplet_status_timer: Countdown,
    history: VelocityHistory,
    couplet_size: Option<f64>,
    couplet_status: Option<CoupletStatus>,
    metrics: ReflectivityMetrics,
    ticks: u64,
}

impl SimState {
    pub fn new(config: &RadarConfig) -> Self {
        let period = config.rotation_period();
        Self {
            rotation_speed: config.rotation_speed,
            true_velocity: config.true_velocity,
            inbound_velocity: config.true_velocity,
            outbound_velocity: config.true_velocity,
            direction: VelocityDirection::Rising,
            rotation_timer: 0.0,
            velocity_timer: Countdown::new(VELOCITY_UPDATE_ROTATIONS, period),
            couplet_size_timer: Countdown::new(COUPLET_SIZE_ROTATIONS, period),
            couplet_status_timer: Countdown::new(COUPLET_STATUS_ROTATIONS, period),
            history: VelocityHistory::new(),
            couplet_size: None,
            couplet_status: None,
            metrics: ReflectivityMetrics::default(),
            ticks: 0,
        }
    }

    /// Reseeds velocities, direction, every timer and the history from
    /// `config`.
    pub fn reset(&mut self, config: &RadarConfig) {
        *self = Self::new(config);
    }

    /// Returns the state one tick of `dt` later together with the events
    /// fired during that tick.
    pub fn advance<R: Rng + ?Sized>(&self, dt: f64, rng: &mut R) -> (Self, Vec<SimEvent>) {
        let mut next = self.clone();
        let events = next.step(dt, rng);
        (next, events)
    }

    fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Vec<SimEvent> {
        let period = self.rotation_period();
        let mut events = Vec::new();

        self.ticks += 1;
        self.rotation_timer += dt;

        if self.velocity_timer.tick(dt, period) {
            self.update_velocities(&mut events);
        }

        if self.couplet_size_timer.tick(dt, period) {
            let noise = rng.gen_range(-COUPLET_SIZE_NOISE..COUPLET_SIZE_NOISE);
            let size = COUPLET_SIZE_SCALE
                .mul_add(self.inbound_velocity, noise)
                .min(COUPLET_SIZE_CAP);
            let published = round2(size);
            self.couplet_size = Some(published);
            events.push(SimEvent::CoupletSizeUpdated(published));
        }

        if self.rotation_timer >= period - FIRE_TOLERANCE {
            self.rotation_timer = (self.rotation_timer - period).max(0.0) % period;
            let sample = self.inbound_velocity;
            let evicted = self.history.push(sample);
            events.push(SimEvent::HistorySampled { sample, evicted });
        }

        if self.couplet_status_timer.tick(dt, period) {
            match self.history.classify() {
                Some(status) => {
                    self.couplet_status = Some(status);
                    events.push(SimEvent::CoupletStatusUpdated(status));
                }
                None => events.push(SimEvent::CoupletStatusSkipped {
                    samples: self.history.len(),
                }),
            }
        }

        let noise = rng.gen_range(0.0..REFLECTIVITY_NOISE);
        self.metrics = ReflectivityMetrics::compute(
            self.inbound_velocity,
            self.outbound_velocity,
            noise,
            &self.history,
            self.couplet_size,
            self.couplet_status,
        );

        events
    }

    fn update_velocities(&mut self, events: &mut Vec<SimEvent>) {
        let step = VELOCITY_STEP * self.direction.sign();
        let (lower, upper) = self.velocity_bounds();

        self.inbound_velocity = (self.inbound_velocity + step).clamp(lower, upper);
        self.outbound_velocity = (self.outbound_velocity - step).clamp(lower, upper);
        events.push(SimEvent::VelocityUpdated {
            inbound: self.inbound_velocity,
            outbound: self.outbound_velocity,
        });

        if self.inbound_velocity >= upper - FIRE_TOLERANCE
            || self.inbound_velocity <= lower + FIRE_TOLERANCE
        {
            self.direction = self.direction.flipped();
            events.push(SimEvent::DirectionFlipped(self.direction));
        }
    }

    /// Seconds for one full sweep.
    pub fn rotation_period(&self) -> f64 {
        60.0 / self.rotation_speed
    }

    /// Fraction of the current sweep completed, in `[0, 1]`.
    pub fn rotation_phase(&self) -> f64 {
        (self.rotation_timer / self.rotation_period()).clamp(0.0, 1.0)
    }

    pub fn velocity_bounds(&self) -> (f64, f64) {
        (
            self.true_velocity - VELOCITY_SPAN,
            self.true_velocity + VELOCITY_SPAN,
        )
    }

    pub const fn true_velocity(&self) -> f64 {
        self.true_velocity
    }

    pub const fn inbound_velocity(&self) -> f64 {
        self.inbound_velocity
    }

    pub const fn outbound_velocity(&self) -> f64 {
        self.outbound_velocity
    }

    pub const fn direction(&self) -> VelocityDirection {
        self.direction
    }

    pub const fn velocity_timer(&self) -> f64 {
        self.velocity_timer.remaining()
    }

    pub const fn couplet_size_timer(&self) -> f64 {
        self.couplet_size_timer.remaining()
    }

    pub const fn couplet_status_timer(&self) -> f64 {
        self.couplet_status_timer.remaining()
    }

    pub const fn history(&self) -> &VelocityHistory {
        &self.history
    }

    pub const fn couplet_size(&self) -> Option<f64> {
        self.couplet_size
    }

    pub const fn couplet_status(&self) -> Option<CoupletStatus> {
        self.couplet_status
    }

    pub const fn metrics(&self) -> &ReflectivityMetrics {
        &self.metrics
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Magnitudes past this carry no hundredths in an f64.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds to two decimals, the precision metrics are published at.
/// Non-finite and very large values pass through unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}
