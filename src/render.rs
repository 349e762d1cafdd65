use crate::utils::{format_duration_min, format_pace};
use crate::workout::{GeoPoint, Kind, Workout};

/// Zoom used whenever the view is re-centered, same for every workout.
const MAP_ZOOM: u8 = 13;

/// Map surface contract: the core hands over records and locations, the
/// surface owns every rendering primitive.
pub trait MapSurface {
    /// Place a marker at the workout's location, popup text = icon +
    /// description, associated with the workout id.
    fn place_marker(&mut self, workout: &Workout);

    /// Center the view on a location at the fixed zoom.
    fn center_on(&mut self, location: GeoPoint);
}

/// List surface contract: one entry per workout, tagged with the id so a
/// later click can be resolved back to its record.
pub trait ListSurface {
    fn append_entry(&mut self, workout: &Workout);
}

/// Terminal stand-in for the map: markers and view changes become log lines.
pub struct TermMap;

impl MapSurface for TermMap {
    fn place_marker(&mut self, workout: &Workout) {
        tracing::info!(
            id = %workout.id,
            lat = workout.location.lat,
            lng = workout.location.lng,
            popup = %format!("{} {}", workout.kind.tag().icon(), workout.description),
            "marker placed"
        );
    }

    fn center_on(&mut self, location: GeoPoint) {
        tracing::info!(
            lat = location.lat,
            lng = location.lng,
            zoom = MAP_ZOOM,
            "view centered"
        );
    }
}

/// Terminal list: one aligned row per workout.
pub struct TermList;

impl ListSurface for TermList {
    fn append_entry(&mut self, workout: &Workout) {
        let metrics = match workout.kind {
            Kind::Running { cadence, pace } => {
                format!("{} min/km\t{cadence} spm", format_pace(pace))
            }
            Kind::Cycling {
                elevation_gain,
                speed,
            } => format!("{speed:.1} km/h\t{elevation_gain:.0} m gain"),
        };

        println!(
            "{}\t{}\t{:.2} km\t{}\t{}",
            workout.id,
            workout.label(),
            workout.distance,
            format_duration_min(workout.duration),
            metrics
        );
    }
}
