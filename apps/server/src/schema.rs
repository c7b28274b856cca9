//! Field table for partial updates: which keys exist, which ones an update
//! may set and the JSON type each settable key must carry.

use crate::error::UpdateError;
use crate::model::BaseFields;
use serde_json::Value;

/// Writes one base field from an already type-checked JSON value.
#[derive(Debug, Clone, Copy)]
pub enum Setter {
    Number(fn(&mut BaseFields, f64)),
    Text(fn(&mut BaseFields, String)),
}

impl Setter {
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }

    pub fn apply(self, base: &mut BaseFields, field: &str, value: &Value) -> Result<(), UpdateError> {
        match (self, value) {
            (Self::Number(set), Value::Number(number)) => {
                let number = number.as_f64().ok_or_else(|| mismatch(field, self))?;
                set(base, number);
                Ok(())
            }
            (Self::Text(set), Value::String(text)) => {
                set(base, text.clone());
                Ok(())
            }
            _ => Err(mismatch(field, self)),
        }
    }
}

fn mismatch(field: &str, setter: Setter) -> UpdateError {
    UpdateError::TypeMismatch {
        field: field.to_string(),
        expected: setter.expected(),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldRole {
    Base(Setter),
    /// Recomputed from the base fields; writes are dropped.
    Derived,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub role: FieldRole,
}

pub static FIELDS: [FieldSpec; 18] = [
    FieldSpec {
        name: "trueVelocity",
        role: FieldRole::Base(Setter::Number(|base, value| base.true_velocity = value)),
    },
    FieldSpec {
        name: "stormDirection",
        role: FieldRole::Base(Setter::Text(|base, value| base.storm_direction = value)),
    },
    FieldSpec {
        name: "stormSpeed",
        role: FieldRole::Base(Setter::Number(|base, value| base.storm_speed = value)),
    },
    FieldSpec {
        name: "hookEcho",
        role: FieldRole::Base(Setter::Text(|base, value| base.hook_echo = value)),
    },
    FieldSpec {
        name: "mesoCenter",
        role: FieldRole::Base(Setter::Text(|base, value| base.meso_center = value)),
    },
    FieldSpec {
        name: "radarDegraded",
        role: FieldRole::Base(Setter::Text(|base, value| base.radar_degraded = value)),
    },
    FieldSpec {
        name: "envAlerts",
        role: FieldRole::Base(Setter::Text(|base, value| base.env_alerts = value)),
    },
    FieldSpec {
        name: "rotationRPM",
        role: FieldRole::Base(Setter::Number(|base, value| base.rotation_rpm = value)),
    },
    FieldSpec {
        name: "inboundVelocity",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "outboundVelocity",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "velocityCouplet",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "coupletSize",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "reflectivity",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "highReflectivityCore",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "possibleHailCore",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "precipitation",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "radarConfidence",
        role: FieldRole::Derived,
    },
    FieldSpec {
        name: "tornadoIntensityEstimate",
        role: FieldRole::Derived,
    },
];

pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}
