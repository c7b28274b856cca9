use crate::domain::CoupletStatus;
use heapless::Deque;

/// Number of inbound samples kept for trend detection
pub const HISTORY_CAPACITY: usize = 5;

const TREND_THRESHOLD: f64 = 0.5;
const TREND_MIN_MOVES: usize = 3;

/// Last few inbound-velocity samples, oldest first.
#[derive(Debug, Clone, Default)]
pub struct VelocityHistory {
    samples: Deque<f64, HISTORY_CAPACITY>,
}

impl VelocityHistory {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Appends a sample and returns the evicted oldest one, if any.
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        let evicted = if self.samples.is_full() {
            self.samples.pop_front()
        } else {
            None
        };

        if let Err(rejected) = self.samples.push_back(sample) {
            tracing::warn!(rejected, "velocity history full, sample dropped");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    fn diffs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(previous, current)| current - previous)
    }

    /// Trend over consecutive samples; `None` with fewer than two samples.
    pub fn classify(&self) -> Option<CoupletStatus> {
        if self.samples.len() < 2 {
            return None;
        }

        let (increasing, decreasing) =
            self.diffs()
                .fold((0_usize, 0_usize), |(up, down), diff| {
                    if diff > TREND_THRESHOLD {
                        (up + 1, down)
                    } else if diff < -TREND_THRESHOLD {
                        (up, down + 1)
                    } else {
                        (up, down)
                    }
                });

        let status = if increasing >= TREND_MIN_MOVES {
            CoupletStatus::Strengthening
        } else if decreasing >= TREND_MIN_MOVES {
            CoupletStatus::Weakening
        } else {
            CoupletStatus::Steady
        };

        Some(status)
    }

    /// Mean absolute change between consecutive samples, 0 below two samples.
    pub fn stability(&self) -> f64 {
        let count = self.samples.len();
        if count < 2 {
            return 0.0;
        }

        let total: f64 = self.diffs().map(f64::abs).sum();
        #[allow(clippy::cast_precision_loss)]
        let steps = (count - 1) as f64;
        total / steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(samples: &[f64]) -> VelocityHistory {
        let mut history = VelocityHistory::new();
        for sample in samples {
            history.push(*sample);
        }
        history
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest_first() {
        let mut history = VelocityHistory::new();
        let mut evicted = Vec::new();

        for sample in 0..20 {
            if let Some(old) = history.push(f64::from(sample)) {
                evicted.push(old);
            }
            assert!(history.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(history.iter().collect::<Vec<_>>(), vec![15.0, 16.0, 17.0, 18.0, 19.0]);
        assert_eq!(evicted.first(), Some(&0.0));
        assert_eq!(evicted.len(), 15);
        assert_eq!(history.latest(), Some(19.0));
    }

    #[test]
    fn classify_needs_two_samples() {
        assert_eq!(VelocityHistory::new().classify(), None);
        assert_eq!(history_of(&[30.0]).classify(), None);
        assert_eq!(history_of(&[30.0, 31.0]).classify(), Some(CoupletStatus::Steady));
    }

    #[test]
    fn strictly_rising_history_is_strengthening() {
        let history = history_of(&[25.0, 25.6, 26.2, 26.8, 27.4]);
        assert_eq!(history.classify(), Some(CoupletStatus::Strengthening));
    }

    #[test]
    fn strictly_falling_history_is_weakening() {
        let history = history_of(&[30.0, 29.0, 28.0, 27.0]);
        assert_eq!(history.classify(), Some(CoupletStatus::Weakening));
    }

    #[test]
    fn half_unit_steps_do_not_count_as_moves() {
        let history = history_of(&[25.0, 25.5, 26.0, 26.5, 27.0]);
        assert_eq!(history.classify(), Some(CoupletStatus::Steady));
    }

    #[test]
    fn mixed_moves_stay_steady() {
        let history = history_of(&[25.0, 27.0, 25.0, 27.0, 25.0]);
        assert_eq!(history.classify(), Some(CoupletStatus::Steady));
    }

    #[test]
    fn stability_is_mean_absolute_step() {
        assert!(VelocityHistory::new().stability().abs() < f64::EPSILON);
        assert!(history_of(&[10.0]).stability().abs() < f64::EPSILON);

        let history = history_of(&[10.0, 12.0, 11.0, 14.0]);
        assert!((history.stability() - 2.0).abs() < 1e-12);
    }
}
