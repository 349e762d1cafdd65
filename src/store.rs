use crate::dlog;
use crate::storage::{Storage, StorageUnavailable};
use crate::workout::{GeoPoint, KindTag, Variant, Workout, WorkoutRecord};
use thiserror::Error;
use uuid::Uuid;

/// Fixed key the whole collection is snapshotted under.
pub const SNAPSHOT_KEY: &str = "workouts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

/// Raised by `add_workout` before anything is appended. Names every
/// offending field so the user can fix the pending input in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid workout input: {}", field_summary(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn field_summary(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inputs that passed validation, with the variant parameter narrowed to its
/// kind-specific meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub distance: f64,
    pub duration: f64,
    pub variant: Variant,
}

/// Check candidate values before any state is created. Values arrive already
/// parsed (numeric or NaN); every field must be finite, distance and duration
/// must be positive, a running cadence must round to a positive step count,
/// a cycling elevation gain must not be negative.
pub fn validate_input(
    kind: KindTag,
    distance: f64,
    duration: f64,
    variant: f64,
) -> Result<ValidatedInput, ValidationError> {
    let mut fields = Vec::new();

    check_positive("distance", distance, &mut fields);
    check_positive("duration", duration, &mut fields);
    match kind {
        KindTag::Running => {
            // Cadence is stored as a whole step count; validate the value it
            // rounds to, so 0.4 cannot slip through as a stored cadence of 0.
            if !variant.is_finite() {
                fields.push(FieldError {
                    field: "cadence",
                    reason: "must be a finite number",
                });
            } else if variant.round() < 1.0 || variant.round() > f64::from(u32::MAX) {
                fields.push(FieldError {
                    field: "cadence",
                    reason: "must round to a positive step count",
                });
            }
        }
        KindTag::Cycling => {
            if !variant.is_finite() {
                fields.push(FieldError {
                    field: "elevationGain",
                    reason: "must be a finite number",
                });
            } else if variant < 0.0 {
                fields.push(FieldError {
                    field: "elevationGain",
                    reason: "must not be negative",
                });
            }
        }
    }

    if !fields.is_empty() {
        return Err(ValidationError { fields });
    }

    let variant = match kind {
        KindTag::Running => Variant::Cadence(variant.round() as u32),
        KindTag::Cycling => Variant::ElevationGain(variant),
    };

    Ok(ValidatedInput {
        distance,
        duration,
        variant,
    })
}

fn check_positive(field: &'static str, value: f64, fields: &mut Vec<FieldError>) {
    if !value.is_finite() {
        fields.push(FieldError {
            field,
            reason: "must be a finite number",
        });
    } else if value <= 0.0 {
        fields.push(FieldError {
            field,
            reason: "must be greater than zero",
        });
    }
}

/// Sole owner of the workout collection. Every mutation goes through here:
/// validate, construct, append, snapshot.
pub struct WorkoutStore<S: Storage> {
    storage: S,
    workouts: Vec<Workout>,
}

impl<S: Storage> WorkoutStore<S> {
    /// Open the store and restore any prior snapshot. A missing snapshot is a
    /// normal cold start; an unreadable or undecodable one degrades to an
    /// empty collection with a warning, never an error.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            workouts: Vec::new(),
        };
        store.restore();
        store
    }

    fn restore(&mut self) {
        let raw = match self.storage.read(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                dlog!("no snapshot found, starting empty");
                return;
            }
            Err(e) => {
                tracing::warn!(err = %e, "snapshot unreadable, starting empty");
                return;
            }
        };

        let records: Vec<WorkoutRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(err = %e, "snapshot does not decode, starting empty");
                return;
            }
        };

        for rec in &records {
            match Workout::from_record(rec) {
                Some(w) => self.workouts.push(w),
                None => {
                    tracing::warn!(id = %rec.id, "skipping snapshot record with inconsistent fields");
                }
            }
        }
        dlog!("restored workouts={}", self.workouts.len());
    }

    /// Validate, construct, append, persist. A validation failure leaves the
    /// collection untouched. A persist failure keeps the appended record for
    /// this session and is reported as a warning, not an error.
    pub fn add_workout(
        &mut self,
        kind: KindTag,
        location: GeoPoint,
        distance: f64,
        duration: f64,
        variant: f64,
    ) -> Result<&Workout, ValidationError> {
        let input = validate_input(kind, distance, duration, variant)?;
        let workout = Workout::new(location, input.distance, input.duration, input.variant);
        dlog!("adding workout id={} kind={}", workout.id, kind.name());

        self.workouts.push(workout);
        if let Err(e) = self.persist() {
            tracing::warn!(err = %e, "snapshot write failed; workout kept for this session only");
        }

        Ok(self
            .workouts
            .last()
            .expect("collection cannot be empty after push"))
    }

    /// Read-only view, insertion order.
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Serialize the whole collection under the fixed key, replacing any
    /// prior snapshot wholesale.
    pub fn persist(&mut self) -> Result<(), StorageUnavailable> {
        let records: Vec<WorkoutRecord> = self.workouts.iter().map(Workout::to_record).collect();
        let raw = serde_json::to_string(&records)
            .map_err(|e| StorageUnavailable::new(format!("encoding snapshot: {e}")))?;
        self.storage.write(SNAPSHOT_KEY, &raw)
    }
}
