use crate::domain::{CoupletStatus, EfRating};
use crate::sim::history::VelocityHistory;

const REFLECTIVITY_CAP: f64 = 80.0;
const REFLECTIVITY_SCALE: f64 = 0.7;
const HIGH_CORE_DBZ: f64 = 50.0;
const HAIL_CORE_DBZ: f64 = 65.0;
const PRECIPITATION_SCALE: f64 = 0.6;
const CONFIDENCE_FLOOR: f64 = 30.0;
const CONFIDENCE_PER_STABILITY: f64 = 5.0;

/// Metrics recomputed on every scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectivityMetrics {
    pub reflectivity: f64,
    pub high_core: bool,
    pub hail_core: bool,
    pub precipitation: f64,
    pub stability: f64,
    pub confidence: f64,
    pub ef_rating: EfRating,
}

impl ReflectivityMetrics {
    /// `noise` is the reflectivity jitter, drawn from `[0, 5)` by the caller.
    pub fn compute(
        inbound: f64,
        outbound: f64,
        noise: f64,
        history: &VelocityHistory,
        couplet_size: Option<f64>,
        couplet_status: Option<CoupletStatus>,
    ) -> Self {
        let average_velocity = (inbound + outbound) / 2.0;
        let reflectivity = average_velocity
            .mul_add(REFLECTIVITY_SCALE, noise)
            .min(REFLECTIVITY_CAP);

        let stability = history.stability();
        let confidence = stability
            .mul_add(-CONFIDENCE_PER_STABILITY, 100.0)
            .max(CONFIDENCE_FLOOR);

        Self {
            reflectivity,
            high_core: reflectivity > HIGH_CORE_DBZ,
            hail_core: reflectivity > HAIL_CORE_DBZ,
            precipitation: reflectivity * PRECIPITATION_SCALE,
            stability,
            confidence,
            ef_rating: EfRating::estimate(couplet_size, couplet_status),
        }
    }
}

impl Default for ReflectivityMetrics {
    fn default() -> Self {
        Self {
            reflectivity: 0.0,
            high_core: false,
            hail_core: false,
            precipitation: 0.0,
            stability: 0.0,
            confidence: 100.0,
            ef_rating: EfRating::Ef0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn reflectivity_tracks_average_velocity() {
        let history = VelocityHistory::new();
        let metrics = ReflectivityMetrics::compute(60.0, 80.0, 2.0, &history, None, None);

        assert_close(metrics.reflectivity, 70.0f64.mul_add(0.7, 2.0));
        assert!(metrics.high_core);
        assert!(!metrics.hail_core);
        assert_close(metrics.precipitation, metrics.reflectivity * 0.6);
        assert_close(metrics.confidence, 100.0);
        assert_eq!(metrics.ef_rating, EfRating::Ef0);
    }

    #[test]
    fn reflectivity_is_capped() {
        let history = VelocityHistory::new();
        let metrics = ReflectivityMetrics::compute(200.0, 200.0, 4.9, &history, None, None);

        assert_close(metrics.reflectivity, 80.0);
        assert!(metrics.hail_core);
        assert_close(metrics.precipitation, 48.0);
    }

    #[test]
    fn confidence_drops_with_instability_but_has_a_floor() {
        let mut history = VelocityHistory::new();
        history.push(10.0);
        history.push(14.0);
        let metrics = ReflectivityMetrics::compute(10.0, 10.0, 0.0, &history, None, None);
        assert_close(metrics.stability, 4.0);
        assert_close(metrics.confidence, 80.0);

        history.push(40.0);
        let metrics = ReflectivityMetrics::compute(10.0, 10.0, 0.0, &history, None, None);
        assert_close(metrics.confidence, 30.0);
    }

    #[test]
    fn ef_rating_uses_published_couplet() {
        let history = VelocityHistory::new();
        let metrics = ReflectivityMetrics::compute(
            25.0,
            25.0,
            0.0,
            &history,
            Some(0.85),
            Some(CoupletStatus::Strengthening),
        );
        assert_eq!(metrics.ef_rating, EfRating::Ef3);
    }
}
