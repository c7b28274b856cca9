/// Slack allowed when a countdown or the rotation timer crosses its edge.
/// Repeated `0.1` steps accumulate float error in the last bits.
pub const FIRE_TOLERANCE: f64 = 1e-9;

/// A countdown measured in rotation periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f64,
    rotations: f64,
}

impl Countdown {
    pub fn new(rotations: f64, period: f64) -> Self {
        Self {
            remaining: rotations * period,
            rotations,
        }
    }

    /// Runs the countdown down by `dt`; returns `true` when it fires, in
    /// which case it has already been rearmed.
    pub fn tick(&mut self, dt: f64, period: f64) -> bool {
        self.remaining -= dt;
        if self.remaining <= FIRE_TOLERANCE {
            self.reset(period);
            return true;
        }
        false
    }

    pub fn reset(&mut self, period: f64) {
        self.remaining = self.rotations * period;
    }

    pub const fn remaining(&self) -> f64 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_configured_rotations_and_rearms() {
        let period = 1.2;
        let mut countdown = Countdown::new(2.0, period);

        let fired_at = (1..=100).find(|_| countdown.tick(0.1, period));

        assert_eq!(fired_at, Some(24));
        assert!((countdown.remaining() - 2.4).abs() < 1e-12);
    }

    #[test]
    fn fires_every_tick_when_period_is_shorter_than_tick() {
        let period = 0.01;
        let mut countdown = Countdown::new(2.0, period);

        assert!(countdown.tick(0.1, period));
        assert!(countdown.tick(0.1, period));
    }
}
