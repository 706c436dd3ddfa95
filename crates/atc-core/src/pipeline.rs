//! Top-level orchestration: raw JSON records in, a full [`AnalysisReport`] out.

use crate::airports::AirportLookup;
use crate::conflict::detect_conflicts;
use crate::error::{AnalysisError, Issue, IssueKind};
use crate::hotspot::{detect_hotspots, HotspotConfig};
use crate::models::{validate_flight_plan, ConflictEvent, FlightPlan, HotspotCell, ResolutionCandidate, TrajectoryPoint};
use crate::parsing::parse_route;
use crate::resolver::propose_resolutions;
use crate::trajectory::build_trajectory;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;

/// Tunables for one analysis run. Defaults match the reference deployment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub sample_sec: i64,
    pub time_bin_sec: i64,
    pub conflict_bucket_deg: f64,
    pub hotspot: HotspotConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_sec: 60,
            time_bin_sec: 60,
            conflict_bucket_deg: 1.0,
            hotspot: HotspotConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Override each field from the environment, falling back to
    /// [`AnalysisConfig::default`] per-field when a variable is unset or
    /// unparsable. Mirrors the `Config::from_env` convention used elsewhere
    /// in this workspace.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            sample_sec: env::var("ATC_SAMPLE_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.sample_sec),
            time_bin_sec: env::var("ATC_TIME_BIN_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.time_bin_sec),
            conflict_bucket_deg: env::var("ATC_CONFLICT_BUCKET_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.conflict_bucket_deg),
            hotspot: HotspotConfig::from_env(),
        }
    }
}

/// Everything a batch analysis run produces, ready to serialize as the
/// response body of a single `/analyze`-style call.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub issues: Vec<Issue>,
    pub trajectories: BTreeMap<String, Vec<TrajectoryPoint>>,
    pub conflicts: Vec<ConflictEvent>,
    pub hotspots: Vec<HotspotCell>,
    pub proposals: BTreeMap<String, Vec<ResolutionCandidate>>,
}

fn record_acid(raw: &Value, index: usize) -> String {
    raw.get("ACID")
        .or_else(|| raw.get("acid"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("index:{index}"))
}

fn get_i64(obj: &serde_json::Map<String, Value>, keys: &[&str], acid: &str, field: &'static str) -> Result<i64, AnalysisError> {
    let value = keys
        .iter()
        .find_map(|k| obj.get(*k))
        .ok_or_else(|| AnalysisError::MissingField {
            acid: acid.to_string(),
            field,
        })?;
    if value.is_boolean() {
        return Err(AnalysisError::WrongType {
            acid: acid.to_string(),
            field,
            expected: "integer",
        });
    }
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| AnalysisError::WrongType {
            acid: acid.to_string(),
            field,
            expected: "integer",
        })
}

fn get_bool(obj: &serde_json::Map<String, Value>, keys: &[&str], acid: &str, field: &'static str) -> Result<bool, AnalysisError> {
    let value = keys
        .iter()
        .find_map(|k| obj.get(*k))
        .ok_or_else(|| AnalysisError::MissingField {
            acid: acid.to_string(),
            field,
        })?;
    value.as_bool().ok_or_else(|| AnalysisError::WrongType {
        acid: acid.to_string(),
        field,
        expected: "boolean",
    })
}

fn get_str(obj: &serde_json::Map<String, Value>, keys: &[&str], acid: &str, field: &'static str) -> Result<String, AnalysisError> {
    let value = keys
        .iter()
        .find_map(|k| obj.get(*k))
        .ok_or_else(|| AnalysisError::MissingField {
            acid: acid.to_string(),
            field,
        })?;
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AnalysisError::WrongType {
            acid: acid.to_string(),
            field,
            expected: "string",
        })
}

fn get_opt_str(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse one raw JSON record into a [`FlightPlan`].
///
/// Accepts both the snake_case field names and the original space-separated
/// aliases (`"Plane type"`, `"departure time"`, `"aircraft speed"`,
/// `"departure airport"`, `"arrival airport"`) so records exported straight
/// from the reference dataset parse without preprocessing.
fn parse_flight_record(raw: &Value, index: usize) -> Result<FlightPlan, AnalysisError> {
    let acid = record_acid(raw, index);
    let obj = raw.as_object().ok_or_else(|| AnalysisError::Schema {
        acid: acid.clone(),
        found: json_type_name(raw).to_string(),
    })?;

    Ok(FlightPlan {
        acid: acid.clone(),
        plane_type: get_str(obj, &["plane_type", "Plane type"], &acid, "plane_type")?,
        route: get_str(obj, &["route"], &acid, "route")?,
        altitude_ft: get_i64(obj, &["altitude_ft", "altitude"], &acid, "altitude_ft")?,
        departure_time: get_i64(obj, &["departure_time", "departure time"], &acid, "departure_time")?,
        speed_kt: get_i64(obj, &["speed_kt", "aircraft speed"], &acid, "speed_kt")?,
        passengers: get_i64(obj, &["passengers"], &acid, "passengers")?,
        is_cargo: get_bool(obj, &["is_cargo"], &acid, "is_cargo")?,
        departure_airport: get_opt_str(obj, &["departure_airport", "departure airport"]),
        arrival_airport: get_opt_str(obj, &["arrival_airport", "arrival airport"]),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_flights(payload: &[Value], issues: &mut Vec<Issue>) -> BTreeMap<String, FlightPlan> {
    let mut flights = BTreeMap::new();
    for (index, item) in payload.iter().enumerate() {
        let acid = record_acid(item, index);
        match parse_flight_record(item, index) {
            Ok(flight) => {
                issues.extend(
                    validate_flight_plan(&flight)
                        .into_iter()
                        .map(|message| Issue::new(flight.acid.clone(), IssueKind::ConstraintWarning, message)),
                );
                flights.insert(flight.acid.clone(), flight);
            }
            Err(err) => issues.push(Issue::from_error(&acid, IssueKind::Schema, &err)),
        }
    }
    flights
}

/// The pass that raised an `AnalysisError`, which determines the `IssueKind`
/// it should be folded into — a failure to parse/expand the route is a
/// different diagnostic from a failure to sample the resulting trajectory.
fn issue_kind_for(err: &AnalysisError) -> IssueKind {
    match err {
        AnalysisError::NonPositiveDistance { .. } | AnalysisError::NonPositiveCadence { .. } => {
            IssueKind::Trajectory
        }
        _ => IssueKind::Route,
    }
}

fn build_trajectories(
    flights: &BTreeMap<String, FlightPlan>,
    airports: &dyn AirportLookup,
    config: &AnalysisConfig,
    issues: &mut Vec<Issue>,
) -> BTreeMap<String, Vec<TrajectoryPoint>> {
    let results: Vec<(String, Result<Vec<TrajectoryPoint>, AnalysisError>)> = flights
        .values()
        .collect::<Vec<&FlightPlan>>()
        .into_par_iter()
        .map(|flight| {
            let result = parse_route(
                &flight.acid,
                &flight.route,
                flight.departure_airport.as_deref(),
                flight.arrival_airport.as_deref(),
                airports,
            )
            .and_then(|points| build_trajectory(flight, &points, config.sample_sec));
            (flight.acid.clone(), result)
        })
        .collect();

    let mut trajectories = BTreeMap::new();
    for (acid, result) in results {
        match result {
            Ok(points) => {
                trajectories.insert(acid, points);
            }
            Err(err) => issues.push(Issue::from_error(&acid, issue_kind_for(&err), &err)),
        }
    }
    trajectories
}

/// Run the full batch pipeline: parse, build trajectories, detect
/// conflicts and hotspots, and propose resolutions.
///
/// A malformed individual flight record never aborts the run — it is
/// recorded as an [`Issue`] and excluded from everything downstream.
/// Conflict detection and hotspot aggregation read the same trajectory
/// map and don't depend on each other, so they run concurrently.
pub fn analyze(payload: &[Value], airports: &dyn AirportLookup, config: &AnalysisConfig) -> AnalysisReport {
    let mut issues = Vec::new();

    tracing::info!(records = payload.len(), "starting analysis batch");

    let flights = parse_flights(payload, &mut issues);
    let trajectories = build_trajectories(&flights, airports, config, &mut issues);

    tracing::debug!(flights = flights.len(), trajectories = trajectories.len(), "parsed batch");

    let (conflicts, hotspots) = rayon::join(
        || detect_conflicts(&trajectories, config.time_bin_sec, config.conflict_bucket_deg),
        || detect_hotspots(&trajectories, &config.hotspot),
    );

    tracing::info!(
        conflicts = conflicts.len(),
        hotspots = hotspots.len(),
        "conflict and hotspot passes complete"
    );

    let proposals = propose_resolutions(&conflicts, &flights);

    AnalysisReport {
        issues,
        trajectories,
        conflicts,
        hotspots,
        proposals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::StaticAirportTable;
    use serde_json::json;

    fn sample_flight(acid: &str, lat: f64, lon: f64) -> Value {
        json!({
            "ACID": acid,
            "plane_type": "Boeing 737",
            "route": format!("{}N/{}W {}N/{}W", lat, lon, lat + 1.0, lon + 1.0),
            "altitude_ft": 35000,
            "departure_time": 0,
            "speed_kt": 450,
            "passengers": 150,
            "is_cargo": false,
        })
    }

    #[test]
    fn clean_batch_produces_no_issues() {
        let payload = vec![sample_flight("FL1", 40.0, 90.0)];
        let airports = StaticAirportTable::canadian();
        let report = analyze(&payload, &airports, &AnalysisConfig::default());
        assert!(report.issues.is_empty());
        assert_eq!(report.trajectories.len(), 1);
    }

    #[test]
    fn malformed_record_becomes_an_issue_not_a_panic() {
        let mut payload = vec![sample_flight("FL1", 40.0, 90.0)];
        payload.push(json!({"ACID": "FL2", "altitude_ft": true}));
        let airports = StaticAirportTable::canadian();
        let report = analyze(&payload, &airports, &AnalysisConfig::default());
        assert_eq!(report.trajectories.len(), 1);
        assert!(report.issues.iter().any(|i| i.flight_ref == "FL2"));
    }

    #[test]
    fn non_object_record_is_reported_by_index() {
        let payload = vec![json!("not an object")];
        let airports = StaticAirportTable::canadian();
        let report = analyze(&payload, &airports, &AnalysisConfig::default());
        assert!(report.issues.iter().any(|i| i.flight_ref == "index:0"));
    }

    #[test]
    fn space_separated_aliases_parse_like_snake_case() {
        let payload = vec![json!({
            "ACID": "FL1",
            "Plane type": "Boeing 737",
            "route": "40N/90W 41N/91W",
            "altitude": 35000,
            "departure time": 0,
            "aircraft speed": 450,
            "passengers": 150,
            "is_cargo": false,
        })];
        let airports = StaticAirportTable::canadian();
        let report = analyze(&payload, &airports, &AnalysisConfig::default());
        assert!(report.issues.is_empty());
        assert_eq!(report.trajectories.len(), 1);
    }

    #[test]
    fn degenerate_route_is_tagged_as_a_trajectory_issue_not_a_route_issue() {
        let payload = vec![json!({
            "ACID": "FL1",
            "plane_type": "Boeing 737",
            "route": "40N/90W 40N/90W",
            "altitude_ft": 35000,
            "departure_time": 0,
            "speed_kt": 450,
            "passengers": 150,
            "is_cargo": false,
        })];
        let airports = StaticAirportTable::canadian();
        let report = analyze(&payload, &airports, &AnalysisConfig::default());
        assert!(report.trajectories.is_empty());
        let issue = report.issues.iter().find(|i| i.flight_ref == "FL1").unwrap();
        assert_eq!(issue.kind, IssueKind::Trajectory);
    }
}
