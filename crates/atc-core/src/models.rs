//! Flight plan record, aircraft classification, and constraint validation.

use serde::{Deserialize, Serialize};

/// A filed flight plan. Immutable once parsed — resolution candidates
/// produce copies with deltas applied via [`FlightPlan::with_altitude`]
/// and friends, never a mutation in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlan {
    pub acid: String,
    pub plane_type: String,
    pub route: String,
    pub altitude_ft: i64,
    pub departure_time: i64,
    pub speed_kt: i64,
    pub passengers: i64,
    pub is_cargo: bool,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
}

impl FlightPlan {
    pub fn with_altitude(&self, altitude_ft: i64) -> Self {
        Self {
            altitude_ft,
            ..self.clone()
        }
    }

    pub fn with_speed(&self, speed_kt: i64) -> Self {
        Self {
            speed_kt,
            ..self.clone()
        }
    }

    pub fn with_departure_time(&self, departure_time: i64) -> Self {
        Self {
            departure_time,
            ..self.clone()
        }
    }
}

/// Position sample produced by the trajectory builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub acid: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: i64,
    pub timestamp: i64,
    pub speed_kt: i64,
}

/// The constraint class an aircraft descriptor resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintClass {
    Jet,
    Turboprop,
    Prop,
    Helicopter,
}

/// Min/max speed and altitude band for a constraint class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintBand {
    pub min_speed_kt: i64,
    pub max_speed_kt: i64,
    pub min_altitude_ft: i64,
    pub max_altitude_ft: i64,
}

impl ConstraintClass {
    pub fn band(self) -> ConstraintBand {
        match self {
            ConstraintClass::Jet => ConstraintBand {
                min_speed_kt: 200,
                max_speed_kt: 550,
                min_altitude_ft: 10_000,
                max_altitude_ft: 45_000,
            },
            ConstraintClass::Turboprop => ConstraintBand {
                min_speed_kt: 150,
                max_speed_kt: 450,
                min_altitude_ft: 5_000,
                max_altitude_ft: 41_000,
            },
            ConstraintClass::Prop => ConstraintBand {
                min_speed_kt: 90,
                max_speed_kt: 220,
                min_altitude_ft: 1_000,
                max_altitude_ft: 18_000,
            },
            ConstraintClass::Helicopter => ConstraintBand {
                min_speed_kt: 60,
                max_speed_kt: 160,
                min_altitude_ft: 0,
                max_altitude_ft: 10_000,
            },
        }
    }
}

/// Aircraft category from the known-type table, before mapping down to a
/// constraint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AircraftCategory {
    Widebody,
    Narrowbody,
    Regional,
    Cargo,
}

impl AircraftCategory {
    fn constraint_class(self) -> ConstraintClass {
        match self {
            AircraftCategory::Widebody
            | AircraftCategory::Narrowbody
            | AircraftCategory::Cargo => ConstraintClass::Jet,
            AircraftCategory::Regional => ConstraintClass::Turboprop,
        }
    }
}

/// (substring key, category), longest keys first so specific models
/// (`boeing 787-9`) are matched before generic ones (`787`).
const KNOWN_AIRCRAFT: &[(&str, AircraftCategory)] = &[
    ("boeing 777-300er", AircraftCategory::Widebody),
    ("boeing 737 max 8", AircraftCategory::Narrowbody),
    ("airbus a300-600f", AircraftCategory::Cargo),
    ("airbus a220-300", AircraftCategory::Narrowbody),
    ("boeing 767-300f", AircraftCategory::Cargo),
    ("boeing 757-200f", AircraftCategory::Cargo),
    ("embraer e195-e2", AircraftCategory::Regional),
    ("boeing 737-800", AircraftCategory::Narrowbody),
    ("bombardier crj", AircraftCategory::Regional),
    ("boeing 737 max", AircraftCategory::Narrowbody),
    ("boeing 787-9", AircraftCategory::Widebody),
    ("embraer e195", AircraftCategory::Regional),
    ("airbus a300f", AircraftCategory::Cargo),
    ("airbus a330", AircraftCategory::Widebody),
    ("airbus a320", AircraftCategory::Narrowbody),
    ("airbus a321", AircraftCategory::Narrowbody),
    ("airbus a220", AircraftCategory::Narrowbody),
    ("boeing 767f", AircraftCategory::Cargo),
    ("boeing 757f", AircraftCategory::Cargo),
    ("boeing 787", AircraftCategory::Widebody),
    ("boeing 777", AircraftCategory::Widebody),
    ("dash 8-400", AircraftCategory::Regional),
    ("boeing 737", AircraftCategory::Narrowbody),
    ("777-300er", AircraftCategory::Widebody),
    ("a300-600f", AircraftCategory::Cargo),
    ("737 max 8", AircraftCategory::Narrowbody),
    ("767-300f", AircraftCategory::Cargo),
    ("757-200f", AircraftCategory::Cargo),
    ("a220-300", AircraftCategory::Narrowbody),
    ("737 max", AircraftCategory::Narrowbody),
    ("e195-e2", AircraftCategory::Regional),
    ("embraer", AircraftCategory::Regional),
    ("737-800", AircraftCategory::Narrowbody),
    ("dash-8", AircraftCategory::Regional),
    ("dash 8", AircraftCategory::Regional),
    ("a300f", AircraftCategory::Cargo),
    ("787-9", AircraftCategory::Widebody),
    ("a330", AircraftCategory::Widebody),
    ("a320", AircraftCategory::Narrowbody),
    ("a321", AircraftCategory::Narrowbody),
    ("a220", AircraftCategory::Narrowbody),
    ("e195", AircraftCategory::Regional),
    ("767f", AircraftCategory::Cargo),
    ("757f", AircraftCategory::Cargo),
    ("q400", AircraftCategory::Regional),
    ("737", AircraftCategory::Narrowbody),
    ("787", AircraftCategory::Widebody),
    ("777", AircraftCategory::Widebody),
    ("crj", AircraftCategory::Regional),
];

/// Classify a free-text aircraft descriptor.
///
/// Returns the resolved constraint class and whether the descriptor
/// actually matched something, as opposed to falling back to the `jet`
/// default. Table entries are ordered longest-key-first so overlapping
/// keys (`737 max 8` vs `737`) resolve to the more specific one.
pub fn classify_aircraft(plane_type: &str) -> (ConstraintClass, bool) {
    let normalized = plane_type.trim().to_lowercase();
    if normalized.is_empty() {
        return (ConstraintClass::Jet, false);
    }

    debug_assert!(
        KNOWN_AIRCRAFT.windows(2).all(|w| w[0].0.len() >= w[1].0.len()),
        "KNOWN_AIRCRAFT must stay sorted longest-key-first"
    );

    for (key, category) in KNOWN_AIRCRAFT {
        if normalized.contains(key) {
            return (category.constraint_class(), true);
        }
    }

    if normalized.contains("heli") {
        return (ConstraintClass::Helicopter, true);
    }
    if normalized.contains("turboprop")
        || (normalized.contains("turbo") && normalized.contains("prop"))
    {
        return (ConstraintClass::Turboprop, true);
    }
    if normalized.contains("prop") || normalized.contains("piston") {
        return (ConstraintClass::Prop, true);
    }
    if normalized.contains("jet") {
        return (ConstraintClass::Jet, true);
    }
    if normalized.contains("boeing") || normalized.contains("airbus") {
        return (ConstraintClass::Jet, true);
    }
    if normalized.starts_with("b7") || normalized.starts_with("a3") || normalized.starts_with("a2")
    {
        return (ConstraintClass::Jet, true);
    }

    (ConstraintClass::Jet, false)
}

/// A detected loss-of-separation event between two flights, coalesced
/// across a contiguous run of time bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEvent {
    pub flight_a: String,
    pub flight_b: String,
    pub start_time: i64,
    pub end_time: i64,
    pub min_horizontal_nm: f64,
    pub min_vertical_ft: i64,
    pub severity: f64,
}

/// Aggregated occupancy for one lat/lon/altitude cell across all the time
/// bins it was occupied in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotCell {
    pub lat_bucket: i64,
    pub lon_bucket: i64,
    pub altitude_band: i64,
    pub time_start: i64,
    pub time_end: i64,
    pub peak_density: i64,
    pub occupancy_minutes: i64,
    pub unique_flights: i64,
    pub score: f64,
}

/// A scored suggestion for resolving a conflict by adjusting one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionCandidate {
    pub flight_id: String,
    pub action_type: String,
    pub summary: String,
    pub delta_altitude_ft: Option<i64>,
    pub delta_speed_kt: Option<i64>,
    pub delta_departure_min: Option<i64>,
    pub reroute_waypoint: Option<String>,
    pub score: f64,
    pub benefit: f64,
    pub cost: f64,
}

/// Check a flight's speed/altitude against its classified constraint band.
///
/// Returns human-readable issue messages; an empty list means valid. The
/// "unknown plane type" message is informational, not a rejection.
pub fn validate_flight_plan(flight: &FlightPlan) -> Vec<String> {
    let mut issues = Vec::new();
    let (class, matched) = classify_aircraft(&flight.plane_type);
    let band = class.band();

    if !matched {
        issues.push(format!(
            "{}: unknown plane type '{}', defaulting to '{:?}' constraints",
            flight.acid, flight.plane_type, class
        ));
    }

    if flight.speed_kt < band.min_speed_kt || flight.speed_kt > band.max_speed_kt {
        issues.push(format!(
            "{}: speed {}kt outside {}-{}kt",
            flight.acid, flight.speed_kt, band.min_speed_kt, band.max_speed_kt
        ));
    }
    if flight.altitude_ft < band.min_altitude_ft || flight.altitude_ft > band.max_altitude_ft {
        issues.push(format!(
            "{}: altitude {}ft outside {}-{}ft",
            flight.acid, flight.altitude_ft, band.min_altitude_ft, band.max_altitude_ft
        ));
    }

    issues
}
