use crate::config::RadarConfig;
use crate::sim::{SimEvent, SimState};
use std::collections::BTreeMap;

/// Placeholder shown for fields that have not been published yet
pub const UNSET: &str = "--";

/// Named text fields the simulation publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayField {
    RadarVehicle,
    RotationSpeed,
    StormDirection,
    StormSpeed,
    HookEcho,
    Mesocyclone,
    Degraded,
    Alerts,
    Inbound,
    InboundTimer,
    Outbound,
    OutboundTimer,
    CoupletSize,
    CoupletSizeTimer,
    CoupletStatus,
    CoupletStatusTimer,
    Reflectivity,
    HighCore,
    HailCore,
    Precipitation,
    Confidence,
    EfRating,
}

impl DisplayField {
    pub const ALL: [Self; 22] = [
        Self::RadarVehicle,
        Self::RotationSpeed,
        Self::StormDirection,
        Self::StormSpeed,
        Self::HookEcho,
        Self::Mesocyclone,
        Self::Degraded,
        Self::Alerts,
        Self::Inbound,
        Self::InboundTimer,
        Self::Outbound,
        Self::OutboundTimer,
        Self::CoupletSize,
        Self::CoupletSizeTimer,
        Self::CoupletStatus,
        Self::CoupletStatusTimer,
        Self::Reflectivity,
        Self::HighCore,
        Self::HailCore,
        Self::Precipitation,
        Self::Confidence,
        Self::EfRating,
    ];

    /// Metric name the field is keyed by.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RadarVehicle => "radarVehicle",
            Self::RotationSpeed => "rotationSpeedDisplay",
            Self::StormDirection => "stormDirection",
            Self::StormSpeed => "stormSpeed",
            Self::HookEcho => "hookEcho",
            Self::Mesocyclone => "mesocyclone",
            Self::Degraded => "degraded",
            Self::Alerts => "alerts",
            Self::Inbound => "inbound",
            Self::InboundTimer => "inbound-timer",
            Self::Outbound => "outbound",
            Self::OutboundTimer => "outbound-timer",
            Self::CoupletSize => "coupletSize",
            Self::CoupletSizeTimer => "coupletSize-timer",
            Self::CoupletStatus => "coupletStatus",
            Self::CoupletStatusTimer => "coupletStatus-timer",
            Self::Reflectivity => "reflectivity",
            Self::HighCore => "highCore",
            Self::HailCore => "hailCore",
            Self::Precipitation => "precipitation",
            Self::Confidence => "confidence",
            Self::EfRating => "efRating",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RadarVehicle => "Radar Vehicle",
            Self::RotationSpeed => "Rotation (RPM)",
            Self::StormDirection => "Storm Direction",
            Self::StormSpeed => "Storm Speed",
            Self::HookEcho => "Hook Echo",
            Self::Mesocyclone => "Mesocyclone",
            Self::Degraded => "Degraded",
            Self::Alerts => "Alerts",
            Self::Inbound => "Inbound",
            Self::InboundTimer | Self::OutboundTimer => "Next update",
            Self::Outbound => "Outbound",
            Self::CoupletSize => "Couplet Size",
            Self::CoupletSizeTimer => "Next size",
            Self::CoupletStatus => "Couplet Status",
            Self::CoupletStatusTimer => "Next status",
            Self::Reflectivity => "Reflectivity (dBZ)",
            Self::HighCore => "High Core",
            Self::HailCore => "Hail Core",
            Self::Precipitation => "Precipitation",
            Self::Confidence => "Confidence",
            Self::EfRating => "EF Rating",
        }
    }
}

/// A rendering surface that receives metric text keyed by field.
pub trait DisplaySurface {
    fn publish(&mut self, field: DisplayField, text: String);
}

/// In-memory surface holding the latest text for every published field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBoard {
    fields: BTreeMap<DisplayField, String>,
}

impl DisplayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest text for `field`, or [`UNSET`] if nothing was published.
    pub fn get(&self, field: DisplayField) -> &str {
        self.fields.get(&field).map_or(UNSET, String::as_str)
    }

    pub fn is_published(&self, field: DisplayField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (DisplayField, &str)> {
        self.fields
            .iter()
            .map(|(field, text)| (*field, text.as_str()))
    }

    /// Every field keyed by metric name, unset ones as [`UNSET`].
    pub fn to_json(&self) -> serde_json::Value {
        let map = DisplayField::ALL
            .into_iter()
            .map(|field| {
                (
                    field.key().to_string(),
                    serde_json::Value::String(self.get(field).to_string()),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl DisplaySurface for DisplayBoard {
    fn publish(&mut self, field: DisplayField, text: String) {
        self.fields.insert(field, text);
    }
}

/// Publishes the static storm description carried by `config`.
pub fn publish_config(config: &RadarConfig, surface: &mut impl DisplaySurface) {
    surface.publish(DisplayField::RadarVehicle, text_or_unset(&config.radar_vehicle));
    surface.publish(
        DisplayField::RotationSpeed,
        format!("{:.2}", config.rotation_speed),
    );
    surface.publish(
        DisplayField::StormDirection,
        text_or_unset(&config.storm_direction),
    );
    surface.publish(DisplayField::StormSpeed, format!("{:.2}", config.storm_speed));
    surface.publish(DisplayField::HookEcho, text_or_unset(&config.hook_echo));
    surface.publish(DisplayField::Mesocyclone, text_or_unset(&config.mesocyclone));
    surface.publish(DisplayField::Degraded, text_or_unset(&config.degraded));
    surface.publish(DisplayField::Alerts, text_or_unset(&config.alerts));
}

/// Publishes what one tick produced: values whose timers fired, plus the
/// countdowns and reflectivity metrics that refresh every tick.
pub fn publish_tick(state: &SimState, events: &[SimEvent], surface: &mut impl DisplaySurface) {
    for event in events {
        match *event {
            SimEvent::VelocityUpdated { inbound, outbound } => {
                surface.publish(DisplayField::Inbound, format!("{inbound:.2}"));
                surface.publish(DisplayField::Outbound, format!("{outbound:.2}"));
            }
            SimEvent::CoupletSizeUpdated(size) => {
                surface.publish(DisplayField::CoupletSize, format!("{size:.2}"));
            }
            SimEvent::CoupletStatusUpdated(status) => {
                surface.publish(DisplayField::CoupletStatus, status.as_str().to_string());
            }
            SimEvent::DirectionFlipped(_)
            | SimEvent::HistorySampled { .. }
            | SimEvent::CoupletStatusSkipped { .. } => {}
        }
    }

    let velocity_timer = format!("{:.1}", state.velocity_timer());
    surface.publish(DisplayField::InboundTimer, velocity_timer.clone());
    surface.publish(DisplayField::OutboundTimer, velocity_timer);
    surface.publish(
        DisplayField::CoupletSizeTimer,
        format!("{:.1}", state.couplet_size_timer()),
    );
    surface.publish(
        DisplayField::CoupletStatusTimer,
        format!("{:.1}", state.couplet_status_timer()),
    );

    let metrics = state.metrics();
    surface.publish(
        DisplayField::Reflectivity,
        format!("{:.2}", metrics.reflectivity),
    );
    surface.publish(DisplayField::HighCore, yes_no(metrics.high_core));
    surface.publish(DisplayField::HailCore, yes_no(metrics.hail_core));
    surface.publish(
        DisplayField::Precipitation,
        format!("{:.2}", metrics.precipitation),
    );
    surface.publish(DisplayField::Confidence, format!("{:.2}", metrics.confidence));
    surface.publish(DisplayField::EfRating, metrics.ef_rating.as_str().to_string());
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn text_or_unset(text: &str) -> String {
    if text.trim().is_empty() {
        UNSET.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoupletStatus;
    use crate::sim::SCAN_INTERVAL;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keys_are_unique() {
        let keys = DisplayField::ALL
            .iter()
            .map(|field| field.key())
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(keys.len(), DisplayField::ALL.len());
    }

    #[test]
    fn unpublished_fields_read_as_placeholder() {
        let board = DisplayBoard::new();
        assert_eq!(board.get(DisplayField::Inbound), UNSET);
        assert!(!board.is_published(DisplayField::Inbound));
    }

    #[test]
    fn publish_config_formats_numbers_and_blanks() {
        let config = RadarConfig {
            rotation_speed: 50.0,
            storm_speed: 32.5,
            storm_direction: "NE".to_string(),
            ..RadarConfig::default()
        };
        let mut board = DisplayBoard::new();

        publish_config(&config, &mut board);

        assert_eq!(board.get(DisplayField::RotationSpeed), "50.00");
        assert_eq!(board.get(DisplayField::StormSpeed), "32.50");
        assert_eq!(board.get(DisplayField::StormDirection), "NE");
        assert_eq!(board.get(DisplayField::Alerts), UNSET);
        assert!(board.is_published(DisplayField::Alerts));
    }

    #[test]
    fn fired_values_publish_only_when_their_event_fires() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = DisplayBoard::new();
        let state = SimState::new(&RadarConfig::default());

        let (state, events) = state.advance(SCAN_INTERVAL, &mut rng);
        publish_tick(&state, &events, &mut board);

        assert!(!board.is_published(DisplayField::Inbound));
        assert_eq!(board.get(DisplayField::InboundTimer), "2.3");
        assert_eq!(board.get(DisplayField::CoupletStatusTimer), "7.1");
        assert!(board.is_published(DisplayField::Reflectivity));
        assert_eq!(board.get(DisplayField::EfRating), "EF0");

        publish_tick(
            &state,
            &[
                SimEvent::VelocityUpdated {
                    inbound: 25.5,
                    outbound: 24.5,
                },
                SimEvent::CoupletStatusUpdated(CoupletStatus::Weakening),
            ],
            &mut board,
        );

        assert_eq!(board.get(DisplayField::Inbound), "25.50");
        assert_eq!(board.get(DisplayField::Outbound), "24.50");
        assert_eq!(board.get(DisplayField::CoupletStatus), "weakening");
    }

    #[test]
    fn json_snapshot_contains_every_key() {
        let board = DisplayBoard::new();
        let json = board.to_json();

        for field in DisplayField::ALL {
            assert_eq!(json[field.key()], UNSET);
        }
    }
}
