use crate::error::UpdateError;
use crate::schema::{self, FieldRole};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const INBOUND_FACTOR: f64 = 0.95;
const OUTBOUND_FACTOR: f64 = 1.05;
const COUPLET_MARGIN: f64 = 5.0;
const COUPLET_SIZE_FACTOR: f64 = 0.02;
const REFLECTIVITY_FACTOR: f64 = 0.5;
const REFLECTIVITY_CAP: f64 = 70.0;
const HIGH_CORE_DBZ: f64 = 55.0;
const HAIL_CORE_DBZ: f64 = 60.0;
const PRECIPITATION_FACTOR: f64 = 0.1;
const RPM_CAP: f64 = 100.0;
const CONFIDENCE_PER_RPM: f64 = 0.5;

/// Magnitudes past this carry no hundredths in an f64, and scaling them by
/// 100 can overflow.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds to two decimals, the precision every derived measurement is
/// reported at. Non-finite and very large values pass through unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoupletTrend {
    Steady,
    Strengthening,
    Weakening,
}

impl CoupletTrend {
    /// Strengthening when inbound trails outbound by more than the margin,
    /// weakening when it leads by more, steady otherwise (margins inclusive).
    pub fn classify(inbound: f64, outbound: f64) -> Self {
        if inbound < outbound - COUPLET_MARGIN {
            Self::Strengthening
        } else if inbound > outbound + COUPLET_MARGIN {
            Self::Weakening
        } else {
            Self::Steady
        }
    }
}

/// Inputs an operator may set through `/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseFields {
    pub true_velocity: f64,
    pub storm_direction: String,
    pub storm_speed: f64,
    pub hook_echo: String,
    pub meso_center: String,
    pub radar_degraded: String,
    pub env_alerts: String,
    #[serde(rename = "rotationRPM")]
    pub rotation_rpm: f64,
}

impl Default for BaseFields {
    fn default() -> Self {
        Self {
            true_velocity: 100.0,
            storm_direction: "N".to_string(),
            storm_speed: 50.0,
            hook_echo: "None".to_string(),
            meso_center: "0 km N of radar".to_string(),
            radar_degraded: "None".to_string(),
            env_alerts: "None".to_string(),
            rotation_rpm: 50.0,
        }
    }
}

/// Values recomputed from [`BaseFields`] before every read and after every
/// write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    pub inbound_velocity: f64,
    pub outbound_velocity: f64,
    pub velocity_couplet: CoupletTrend,
    pub couplet_size: f64,
    pub reflectivity: f64,
    pub high_reflectivity_core: bool,
    pub possible_hail_core: bool,
    pub precipitation: f64,
    pub radar_confidence: f64,
    pub tornado_intensity_estimate: u8,
}

impl DerivedFields {
    pub fn compute(base: &BaseFields) -> Self {
        let rv = base.true_velocity;

        let inbound_velocity = round2(rv * INBOUND_FACTOR);
        let outbound_velocity = round2(rv * OUTBOUND_FACTOR);
        let velocity_couplet = CoupletTrend::classify(inbound_velocity, outbound_velocity);

        let reflectivity = round2((rv * REFLECTIVITY_FACTOR).min(REFLECTIVITY_CAP));

        Self {
            inbound_velocity,
            outbound_velocity,
            velocity_couplet,
            couplet_size: round2(rv * COUPLET_SIZE_FACTOR),
            reflectivity,
            high_reflectivity_core: reflectivity > HIGH_CORE_DBZ,
            possible_hail_core: reflectivity > HAIL_CORE_DBZ,
            precipitation: round2(reflectivity * PRECIPITATION_FACTOR),
            radar_confidence: base
                .rotation_rpm
                .min(RPM_CAP)
                .mul_add(-CONFIDENCE_PER_RPM, 100.0),
            tornado_intensity_estimate: if velocity_couplet == CoupletTrend::Strengthening {
                3
            } else {
                1
            },
        }
    }
}

impl Default for DerivedFields {
    /// Placeholder values served until the first recalculation.
    fn default() -> Self {
        Self {
            inbound_velocity: 0.0,
            outbound_velocity: 0.0,
            velocity_couplet: CoupletTrend::Steady,
            couplet_size: 0.0,
            reflectivity: 0.0,
            high_reflectivity_core: false,
            possible_hail_core: false,
            precipitation: 0.0,
            radar_confidence: 100.0,
            tornado_intensity_estimate: 0,
        }
    }
}

/// The single radar record the server holds, serialized as one flat object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarRecord {
    #[serde(flatten)]
    pub base: BaseFields,
    #[serde(flatten)]
    pub derived: DerivedFields,
}

impl RadarRecord {
    pub fn recalculate(&mut self) {
        self.derived = DerivedFields::compute(&self.base);
    }

    /// Recalculates and returns a copy of the full record.
    pub fn snapshot(&mut self) -> Self {
        self.recalculate();
        self.clone()
    }

    /// Applies a partial update. Base fields must carry the JSON type the
    /// schema names; derived fields are accepted and dropped, unknown keys
    /// are ignored. A single mismatch rejects the whole update and leaves the
    /// record as it was.
    pub fn apply_update(&mut self, updates: &Map<String, Value>) -> Result<Self, UpdateError> {
        let mut staged = self.base.clone();

        for (key, value) in updates {
            match schema::lookup(key).map(|spec| spec.role) {
                Some(FieldRole::Base(setter)) => setter.apply(&mut staged, key, value)?,
                Some(FieldRole::Derived) => {
                    tracing::debug!(field = %key, "ignoring write to derived field");
                }
                None => {
                    tracing::debug!(field = %key, "ignoring unknown field");
                }
            }
        }

        self.base = staged;
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn updates(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn round2_rounds_to_hundredths() {
        assert_close(round2(1.234), 1.23);
        assert_close(round2(1.235_1), 1.24);
        assert_close(round2(-2.5), -2.5);
        assert_close(round2(95.0), 95.0);
    }

    #[test]
    fn round2_leaves_huge_values_finite() {
        assert_close(round2(9.5e307), 9.5e307);
        assert_close(round2(-1.2e20), -1.2e20);
        assert!(round2(f64::INFINITY).is_infinite());
    }

    #[test]
    fn huge_true_velocity_keeps_couplet_trend() {
        let rv = 1e308;
        let derived = DerivedFields::compute(&BaseFields {
            true_velocity: rv,
            ..BaseFields::default()
        });

        assert!(derived.inbound_velocity.is_finite());
        assert_close(derived.inbound_velocity, rv * 0.95);
        assert_eq!(derived.velocity_couplet, CoupletTrend::Strengthening);
        assert_eq!(derived.tornado_intensity_estimate, 3);
        assert_close(derived.reflectivity, 70.0);
    }

    #[test]
    fn default_record_recalculates_from_initial_base() {
        let mut record = RadarRecord::default();
        assert_eq!(record.derived.tornado_intensity_estimate, 0);

        let snapshot = record.snapshot();

        assert_close(snapshot.derived.inbound_velocity, 95.0);
        assert_close(snapshot.derived.outbound_velocity, 105.0);
        assert_eq!(snapshot.derived.velocity_couplet, CoupletTrend::Strengthening);
        assert_close(snapshot.derived.couplet_size, 2.0);
        assert_close(snapshot.derived.reflectivity, 50.0);
        assert!(!snapshot.derived.high_reflectivity_core);
        assert_close(snapshot.derived.precipitation, 5.0);
        assert_close(snapshot.derived.radar_confidence, 75.0);
        assert_eq!(snapshot.derived.tornado_intensity_estimate, 3);
    }

    #[test]
    fn velocities_follow_true_velocity() {
        for rv in [0.0, 12.34, 50.0, 99.99, 250.0, -40.0] {
            let derived = DerivedFields::compute(&BaseFields {
                true_velocity: rv,
                ..BaseFields::default()
            });
            assert_close(derived.inbound_velocity, round2(rv * 0.95));
            assert_close(derived.outbound_velocity, round2(rv * 1.05));
        }
    }

    #[test]
    fn couplet_margin_is_inclusive() {
        assert_eq!(CoupletTrend::classify(47.5, 52.5), CoupletTrend::Steady);
        assert_eq!(CoupletTrend::classify(47.49, 52.5), CoupletTrend::Strengthening);
        assert_eq!(CoupletTrend::classify(57.5, 52.5), CoupletTrend::Steady);
        assert_eq!(CoupletTrend::classify(57.51, 52.5), CoupletTrend::Weakening);

        let derived = DerivedFields::compute(&BaseFields {
            true_velocity: 50.0,
            ..BaseFields::default()
        });
        assert_eq!(derived.velocity_couplet, CoupletTrend::Steady);
        assert_eq!(derived.tornado_intensity_estimate, 1);
    }

    #[test]
    fn reflectivity_caps_and_flags_cores() {
        let derived = DerivedFields::compute(&BaseFields {
            true_velocity: 200.0,
            ..BaseFields::default()
        });

        assert_close(derived.reflectivity, 70.0);
        assert!(derived.high_reflectivity_core);
        assert!(derived.possible_hail_core);
        assert_close(derived.precipitation, 7.0);
    }

    #[test]
    fn confidence_saturates_at_high_rpm() {
        let derived = DerivedFields::compute(&BaseFields {
            rotation_rpm: 400.0,
            ..BaseFields::default()
        });
        assert_close(derived.radar_confidence, 50.0);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut record = RadarRecord::default();
        let first = record.snapshot();
        let second = record.snapshot();
        assert_eq!(first, second);
    }

    #[test]
    fn update_applies_base_fields_and_drops_the_rest() -> Result<(), Box<dyn std::error::Error>> {
        let mut record = RadarRecord::default();

        let updated = record.apply_update(&updates(json!({
            "trueVelocity": 200,
            "stormDirection": "SW",
            "reflectivity": 1.0,
            "unknownField": 1
        })))?;

        assert_close(updated.base.true_velocity, 200.0);
        assert_eq!(updated.base.storm_direction, "SW");
        assert_close(updated.derived.reflectivity, 70.0);

        let json = serde_json::to_value(&updated)?;
        assert!(json.get("unknownField").is_none());
        Ok(())
    }

    #[test]
    fn mismatched_type_rejects_whole_update() {
        let mut record = RadarRecord::default();
        let before = record.snapshot();

        let result = record.apply_update(&updates(json!({
            "stormDirection": "E",
            "trueVelocity": "fast"
        })));

        assert!(matches!(
            result,
            Err(UpdateError::TypeMismatch { ref field, expected: "number" }) if field == "trueVelocity"
        ));
        assert_eq!(record.snapshot(), before);
    }

    #[test]
    fn serializes_as_one_flat_camel_case_object() -> Result<(), Box<dyn std::error::Error>> {
        let mut record = RadarRecord::default();
        let json = serde_json::to_value(record.snapshot())?;

        assert_eq!(json["rotationRPM"], 50.0);
        assert_eq!(json["mesoCenter"], "0 km N of radar");
        assert_eq!(json["velocityCouplet"], "strengthening");
        assert_eq!(json["possibleHailCore"], false);
        assert_eq!(json.as_object().map(Map::len), Some(18));
        Ok(())
    }
}
