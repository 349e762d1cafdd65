use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where on the map the workout happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lng]
    }
}

/// Activity discriminator, also the `kind` field of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Running,
    Cycling,
}

impl KindTag {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃",
            Self::Cycling => "🚴",
        }
    }
}

/// Validated variant input: cadence for running, elevation gain for cycling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Cadence(u32),
    ElevationGain(f64),
}

/// Variant fields together with the metric derived from distance/duration.
///
/// `pace` is min/km, `speed` is km/h. Both are computed in the constructor
/// and nowhere else; restoring from a snapshot goes through the same path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Kind {
    pub const fn tag(self) -> KindTag {
        match self {
            Self::Running { .. } => KindTag::Running,
            Self::Cycling { .. } => KindTag::Cycling,
        }
    }
}

/// One recorded activity. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: GeoPoint,
    pub distance: f64,
    pub duration: f64,
    pub kind: Kind,
    pub description: String,
}

impl Workout {
    /// Build a fresh record from already-validated inputs. Assigns the id,
    /// stamps the creation time (truncated to milliseconds so the stored
    /// epoch-millis form round-trips exactly) and derives the variant metric
    /// and description.
    pub fn new(location: GeoPoint, distance: f64, duration: f64, variant: Variant) -> Self {
        let now = Utc::now();
        let timestamp = Utc
            .timestamp_millis_opt(now.timestamp_millis())
            .single()
            .unwrap_or(now);
        Self::assemble(Uuid::new_v4(), timestamp, location, distance, duration, variant)
    }

    fn assemble(
        id: Uuid,
        timestamp: DateTime<Utc>,
        location: GeoPoint,
        distance: f64,
        duration: f64,
        variant: Variant,
    ) -> Self {
        let kind = match variant {
            Variant::Cadence(cadence) => Kind::Running {
                cadence,
                pace: duration / distance,
            },
            Variant::ElevationGain(elevation_gain) => Kind::Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            },
        };

        let description = format!("{} on {}", kind.tag().name(), timestamp.format("%B %-d"));

        Self {
            id,
            timestamp,
            location,
            distance,
            duration,
            kind,
            description,
        }
    }

    /// Pace (min/km) for running, speed (km/h) for cycling.
    pub const fn derived_metric(&self) -> f64 {
        match self.kind {
            Kind::Running { pace, .. } => pace,
            Kind::Cycling { speed, .. } => speed,
        }
    }

    pub fn label(&self) -> &str {
        &self.description
    }

    pub fn to_record(&self) -> WorkoutRecord {
        let (cadence, elevation_gain) = match self.kind {
            Kind::Running { cadence, .. } => (Some(cadence), None),
            Kind::Cycling { elevation_gain, .. } => (None, Some(elevation_gain)),
        };

        WorkoutRecord {
            id: self.id,
            timestamp: self.timestamp.timestamp_millis(),
            location: self.location.into(),
            distance: self.distance,
            duration: self.duration,
            kind: self.kind.tag(),
            cadence,
            elevation_gain,
        }
    }

    /// Rebuild a workout from its persisted form, re-running the derivation
    /// so pace/speed/description come out identical to construction time.
    /// Returns `None` for records whose timestamp or variant field does not
    /// line up with the declared kind.
    pub fn from_record(rec: &WorkoutRecord) -> Option<Self> {
        let timestamp = Utc.timestamp_millis_opt(rec.timestamp).single()?;
        let variant = match rec.kind {
            KindTag::Running => Variant::Cadence(rec.cadence?),
            KindTag::Cycling => Variant::ElevationGain(rec.elevation_gain?),
        };

        Some(Self::assemble(
            rec.id,
            timestamp,
            GeoPoint::from(rec.location),
            rec.distance,
            rec.duration,
            variant,
        ))
    }
}

/// The plain persisted form: raw fields only, derived values are recomputed
/// on restore. The snapshot carries no version field, so the variant fields
/// are optional and unknown fields are ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub timestamp: i64,
    pub location: [f64; 2],
    pub distance: f64,
    pub duration: f64,
    pub kind: KindTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-01T00:00:00Z
    const FIXED_MS: i64 = 1_714_521_600_000;

    fn fixed_running(distance: f64, duration: f64, cadence: u32) -> Workout {
        let ts = Utc.timestamp_millis_opt(FIXED_MS).single().unwrap();
        Workout::assemble(
            Uuid::new_v4(),
            ts,
            GeoPoint { lat: 39.0, lng: -12.0 },
            distance,
            duration,
            Variant::Cadence(cadence),
        )
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::new(
            GeoPoint { lat: 39.0, lng: -12.0 },
            5.2,
            24.0,
            Variant::Cadence(178),
        );
        let expected = 24.0 / 5.2;
        assert!((w.derived_metric() - expected).abs() < 1e-12);
        assert!((w.derived_metric() - 4.615).abs() < 1e-3);
        match w.kind {
            Kind::Running { cadence, pace } => {
                assert_eq!(cadence, 178);
                assert!((pace - expected).abs() < 1e-12);
            }
            Kind::Cycling { .. } => panic!("expected a running workout"),
        }
    }

    #[test]
    fn cycling_speed_is_distance_over_hours() {
        let w = Workout::new(
            GeoPoint { lat: 39.0, lng: -12.0 },
            5.2,
            4.0,
            Variant::ElevationGain(178.0),
        );
        assert!((w.derived_metric() - 78.0).abs() < f64::EPSILON);
    }

    #[test]
    fn description_holds_kind_month_and_day() {
        let w = fixed_running(5.0, 30.0, 170);
        assert_eq!(w.label(), "Running on May 1");

        let now = Utc::now();
        let fresh = Workout::new(GeoPoint { lat: 0.0, lng: 0.0 }, 1.0, 1.0, Variant::Cadence(1));
        assert!(fresh.description.starts_with("Running on"));
        assert!(fresh.description.contains(&now.format("%B").to_string()));
    }

    #[test]
    fn back_to_back_workouts_get_distinct_ids() {
        let a = Workout::new(GeoPoint { lat: 1.0, lng: 2.0 }, 3.0, 4.0, Variant::Cadence(5));
        let b = Workout::new(GeoPoint { lat: 1.0, lng: 2.0 }, 3.0, 4.0, Variant::Cadence(5));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn record_round_trip_reproduces_derived_fields() {
        let w = fixed_running(5.2, 24.0, 178);
        let json = serde_json::to_string(&w.to_record()).unwrap();
        let rec: WorkoutRecord = serde_json::from_str(&json).unwrap();
        let restored = Workout::from_record(&rec).unwrap();
        assert_eq!(restored, w);
    }

    #[test]
    fn record_uses_wire_field_names() {
        let w = Workout::new(
            GeoPoint { lat: 39.0, lng: -12.0 },
            5.2,
            4.0,
            Variant::ElevationGain(178.0),
        );
        let json = serde_json::to_string(&w.to_record()).unwrap();
        assert!(json.contains("\"kind\":\"cycling\""));
        assert!(json.contains("\"elevationGain\":178.0"));
        assert!(json.contains("\"location\":[39.0,-12.0]"));
        assert!(!json.contains("cadence"));
        assert!(!json.contains("speed"));
        assert!(!json.contains("description"));
    }

    #[test]
    fn record_with_missing_variant_field_is_rejected() {
        let mut rec = fixed_running(5.0, 30.0, 170).to_record();
        rec.cadence = None;
        assert!(Workout::from_record(&rec).is_none());
    }

    #[test]
    fn unknown_snapshot_fields_are_ignored() {
        let json = format!(
            "{{\"id\":\"{}\",\"timestamp\":{FIXED_MS},\"location\":[39.0,-12.0],\
             \"distance\":5.2,\"duration\":24.0,\"kind\":\"running\",\
             \"cadence\":178,\"laterAddition\":true}}",
            Uuid::new_v4()
        );
        let rec: WorkoutRecord = serde_json::from_str(&json).unwrap();
        let w = Workout::from_record(&rec).unwrap();
        assert_eq!(w.label(), "Running on May 1");
    }
}
