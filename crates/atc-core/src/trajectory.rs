//! Sampling a flight plan's route into timestamped position points.

use crate::error::AnalysisError;
use crate::geodesy::{great_circle_nm, interpolate};
use crate::models::{FlightPlan, TrajectoryPoint};
use crate::parsing::Waypoint;

fn segment_distances(points: &[Waypoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| great_circle_nm(pair[0], pair[1]))
        .collect()
}

/// Sample `flight`'s route at `sample_sec` intervals, producing one
/// [`TrajectoryPoint`] per tick from departure through arrival.
///
/// `points` must already be the expanded waypoint list (see
/// [`crate::parsing::parse_route`]). Walks segment-by-segment, carrying
/// leftover distance from a finished segment into the next tick rather
/// than snapping ticks to segment boundaries.
pub fn build_trajectory(
    flight: &FlightPlan,
    points: &[Waypoint],
    sample_sec: i64,
) -> Result<Vec<TrajectoryPoint>, AnalysisError> {
    if sample_sec <= 0 {
        return Err(AnalysisError::NonPositiveCadence {
            acid: flight.acid.clone(),
        });
    }

    let distances = segment_distances(points);
    let total_nm: f64 = distances.iter().sum();
    if total_nm <= 0.0 {
        return Err(AnalysisError::NonPositiveDistance {
            acid: flight.acid.clone(),
        });
    }

    let speed_kt = flight.speed_kt.max(1);
    let total_sec = ((total_nm / speed_kt as f64) * 3600.0).ceil() as i64;

    let mut trajectory = Vec::new();
    let mut elapsed: i64 = 0;
    let mut segment_index = 0usize;
    let mut segment_progress = 0.0f64;
    let mut segment_remaining = distances[0];

    while elapsed <= total_sec {
        while segment_index < distances.len() && segment_remaining <= 0.0 {
            segment_index += 1;
            if segment_index < distances.len() {
                segment_remaining = distances[segment_index];
                segment_progress = 0.0;
            }
        }

        let (lat, lon) = if segment_index >= distances.len() {
            points[points.len() - 1]
        } else {
            let segment_len = distances[segment_index].max(1e-6);
            let t = (segment_progress / segment_len).min(1.0);
            interpolate(points[segment_index], points[segment_index + 1], t)
        };

        trajectory.push(TrajectoryPoint {
            acid: flight.acid.clone(),
            lat,
            lon,
            altitude_ft: flight.altitude_ft,
            timestamp: flight.departure_time + elapsed,
            speed_kt: flight.speed_kt,
        });

        elapsed += sample_sec;
        let advance_nm = speed_kt as f64 * sample_sec as f64 / 3600.0;
        segment_progress += advance_nm;
        segment_remaining -= advance_nm;
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(speed_kt: i64) -> FlightPlan {
        FlightPlan {
            acid: "T1".to_string(),
            plane_type: "Boeing 737".to_string(),
            route: String::new(),
            altitude_ft: 35_000,
            departure_time: 1_000,
            speed_kt,
            passengers: 100,
            is_cargo: false,
            departure_airport: None,
            arrival_airport: None,
        }
    }

    #[test]
    fn first_point_matches_departure() {
        let points = [(0.0, 0.0), (0.0, 1.0)];
        let traj = build_trajectory(&flight(480), &points, 60).unwrap();
        let first = &traj[0];
        assert_eq!(first.timestamp, 1_000);
        assert!((first.lat - 0.0).abs() < 1e-9);
        assert!((first.lon - 0.0).abs() < 1e-9);
    }

    #[test]
    fn last_point_reaches_final_waypoint() {
        let points = [(0.0, 0.0), (0.0, 1.0)];
        let traj = build_trajectory(&flight(480), &points, 60).unwrap();
        let last = traj.last().unwrap();
        assert!((last.lat - points[1].0).abs() < 1e-6);
        assert!((last.lon - points[1].1).abs() < 1e-6);
    }

    #[test]
    fn multi_segment_route_advances_through_each_leg() {
        let points = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let traj = build_trajectory(&flight(400), &points, 30).unwrap();
        assert!(traj.len() > 2);
        let last = traj.last().unwrap();
        assert!((last.lat - 1.0).abs() < 1e-6);
        assert!((last.lon - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let points = [(0.0, 0.0), (0.0, 1.0)];
        let err = build_trajectory(&flight(400), &points, 0).unwrap_err();
        assert!(matches!(err, AnalysisError::NonPositiveCadence { .. }));
    }

    #[test]
    fn degenerate_route_is_rejected() {
        let points = [(0.0, 0.0), (0.0, 0.0)];
        let err = build_trajectory(&flight(400), &points, 60).unwrap_err();
        assert!(matches!(err, AnalysisError::NonPositiveDistance { .. }));
    }
}
