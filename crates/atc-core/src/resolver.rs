//! Conflict resolution candidate generation and scoring.

use crate::models::{validate_flight_plan, ConflictEvent, FlightPlan, ResolutionCandidate};
use std::collections::BTreeMap;

const ALTITUDE_STEPS: &[i64] = &[-4000, -2000, 2000, 4000];
const SPEED_STEPS: &[i64] = &[-25, -15, -10, 10, 15, 25];
const DEPARTURE_STEPS: &[i64] = &[-10, -5, -2, 2, 5, 10];

/// Weights used to trade conflict-severity benefit against disruption cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub conflict_weight: f64,
    pub delay_weight: f64,
    pub altitude_weight: f64,
    pub speed_weight: f64,
    pub complexity_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            conflict_weight: 1.0,
            delay_weight: 0.04,
            altitude_weight: 0.002,
            speed_weight: 0.01,
            complexity_weight: 0.2,
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Score a draft candidate against the conflict it's meant to resolve.
///
/// Pure: takes an unscored draft and returns a new, finalized candidate
/// rather than mutating the one passed in.
pub fn score_candidate(
    candidate: &ResolutionCandidate,
    conflict: &ConflictEvent,
    weights: &ScoreWeights,
) -> ResolutionCandidate {
    let delay = candidate.delta_departure_min.unwrap_or(0).abs();
    let altitude = candidate.delta_altitude_ft.unwrap_or(0).abs();
    let speed = candidate.delta_speed_kt.unwrap_or(0).abs();
    let complexity = if candidate.reroute_waypoint.is_some() {
        1.0
    } else {
        0.3
    };

    let benefit = round4(conflict.severity * weights.conflict_weight);
    let cost = round4(
        delay as f64 * weights.delay_weight
            + altitude as f64 * weights.altitude_weight
            + speed as f64 * weights.speed_weight
            + complexity * weights.complexity_weight,
    );

    ResolutionCandidate {
        benefit,
        cost,
        score: round4(benefit - cost),
        ..candidate.clone()
    }
}

fn draft(
    flight_id: &str,
    action_type: &str,
    summary: String,
    delta_altitude_ft: Option<i64>,
    delta_speed_kt: Option<i64>,
    delta_departure_min: Option<i64>,
    reroute_waypoint: Option<&str>,
) -> ResolutionCandidate {
    ResolutionCandidate {
        flight_id: flight_id.to_string(),
        action_type: action_type.to_string(),
        summary,
        delta_altitude_ft,
        delta_speed_kt,
        delta_departure_min,
        reroute_waypoint: reroute_waypoint.map(str::to_string),
        score: 0.0,
        benefit: 0.0,
        cost: 0.0,
    }
}

fn valid_with_altitude_delta(flight: &FlightPlan, delta: i64) -> bool {
    validate_flight_plan(&flight.with_altitude(flight.altitude_ft + delta)).is_empty()
}

fn valid_with_speed_delta(flight: &FlightPlan, delta: i64) -> bool {
    validate_flight_plan(&flight.with_speed(flight.speed_kt + delta)).is_empty()
}

/// Propose up to three ranked resolutions per flight per conflict it's
/// involved in.
///
/// Keys the result as `"{flight_a}-{flight_b}:{flight_id}"` so a flight
/// that appears in multiple conflicts gets a distinct candidate list per
/// conflict rather than one merged list.
pub fn propose_resolutions(
    conflicts: &[ConflictEvent],
    flights: &BTreeMap<String, FlightPlan>,
) -> BTreeMap<String, Vec<ResolutionCandidate>> {
    let weights = ScoreWeights::default();
    let mut proposals = BTreeMap::new();

    for conflict in conflicts {
        for flight_id in [&conflict.flight_a, &conflict.flight_b] {
            let Some(flight) = flights.get(flight_id) else {
                continue;
            };

            let mut candidates = Vec::new();

            for &delta in ALTITUDE_STEPS {
                if valid_with_altitude_delta(flight, delta) {
                    candidates.push(draft(
                        flight_id,
                        "altitude",
                        format!("Change altitude by {delta:+} ft"),
                        Some(delta),
                        None,
                        None,
                        None,
                    ));
                }
            }

            for &delta in SPEED_STEPS {
                if valid_with_speed_delta(flight, delta) {
                    candidates.push(draft(
                        flight_id,
                        "speed",
                        format!("Change speed by {delta:+} kt"),
                        None,
                        Some(delta),
                        None,
                        None,
                    ));
                }
            }

            for &delta in DEPARTURE_STEPS {
                candidates.push(draft(
                    flight_id,
                    "departure",
                    format!("Shift departure by {delta:+} min"),
                    None,
                    None,
                    Some(delta),
                    None,
                ));
            }

            if !flight.route.is_empty() {
                candidates.push(draft(
                    flight_id,
                    "reroute",
                    "Insert waypoint FIX01".to_string(),
                    None,
                    None,
                    None,
                    Some("FIX01"),
                ));
            }

            let mut scored: Vec<ResolutionCandidate> = candidates
                .iter()
                .map(|c| score_candidate(c, conflict, &weights))
                .collect();
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
            scored.truncate(3);

            let key = format!("{}-{}:{}", conflict.flight_a, conflict.flight_b, flight_id);
            proposals.insert(key, scored);
        }
    }

    proposals
}
