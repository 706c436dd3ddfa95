//! Pairwise loss-of-separation detection over a batch of trajectories.
//!
//! Scans a fixed set of already-sampled trajectory points: bucket by time
//! and space, test only same-bucket/neighbor-bucket pairs, then coalesce
//! consecutive hits into one event per flight pair.

use crate::geodesy::great_circle_nm;
use crate::models::{ConflictEvent, TrajectoryPoint};
use std::collections::{BTreeMap, HashSet};

pub const HORIZONTAL_THRESHOLD_NM: f64 = 5.0;
pub const VERTICAL_THRESHOLD_FT: i64 = 2000;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn bucket_key(lat: f64, lon: f64, bucket_deg: f64) -> (i64, i64) {
    ((lat / bucket_deg).floor() as i64, (lon / bucket_deg).floor() as i64)
}

fn neighbor_keys(key: (i64, i64)) -> impl Iterator<Item = (i64, i64)> {
    (-1..=1).flat_map(move |dlat| (-1..=1).map(move |dlon| (key.0 + dlat, key.1 + dlon)))
}

fn severity(horizontal_nm: f64, vertical_ft: i64) -> f64 {
    let horiz = ((HORIZONTAL_THRESHOLD_NM - horizontal_nm) / HORIZONTAL_THRESHOLD_NM).max(0.0);
    let vert = ((VERTICAL_THRESHOLD_FT - vertical_ft) as f64 / VERTICAL_THRESHOLD_FT as f64).max(0.0);
    round4(horiz + vert)
}

/// Detect and coalesce separation violations across every flight pair in
/// `trajectories`.
///
/// Points are binned by `time_bin_sec`, then within each time bin by a
/// `bucket_deg` x `bucket_deg` lat/lon grid; only points sharing a bucket
/// or an adjacent one are ever distance-checked, which keeps this close to
/// linear in the number of points rather than quadratic in flight count.
/// Hits are deduplicated per `(sorted flight pair, timestamp)` since a
/// point can appear as a neighbor-bucket candidate more than once, then
/// runs of hits no more than `time_bin_sec` apart are coalesced into a
/// single event.
pub fn detect_conflicts(
    trajectories: &BTreeMap<String, Vec<TrajectoryPoint>>,
    time_bin_sec: i64,
    bucket_deg: f64,
) -> Vec<ConflictEvent> {
    let mut bins: BTreeMap<i64, Vec<&TrajectoryPoint>> = BTreeMap::new();
    for points in trajectories.values() {
        for point in points {
            bins.entry(point.timestamp.div_euclid(time_bin_sec))
                .or_default()
                .push(point);
        }
    }

    let mut raw_hits: BTreeMap<(String, String), Vec<(i64, f64, i64)>> = BTreeMap::new();

    for points in bins.values() {
        let mut spatial: BTreeMap<(i64, i64), Vec<&TrajectoryPoint>> = BTreeMap::new();
        for point in points {
            spatial
                .entry(bucket_key(point.lat, point.lon, bucket_deg))
                .or_default()
                .push(point);
        }

        let mut checked_pairs: HashSet<((String, String), i64)> = HashSet::new();
        for (bucket, bucket_points) in &spatial {
            let mut candidates: Vec<&TrajectoryPoint> = Vec::new();
            for neighbor in neighbor_keys(*bucket) {
                if let Some(pts) = spatial.get(&neighbor) {
                    candidates.extend(pts.iter().copied());
                }
            }

            for point_a in bucket_points {
                for point_b in &candidates {
                    if point_a.acid == point_b.acid {
                        continue;
                    }
                    let pair = if point_a.acid <= point_b.acid {
                        (point_a.acid.clone(), point_b.acid.clone())
                    } else {
                        (point_b.acid.clone(), point_a.acid.clone())
                    };
                    let pair_key = (pair.clone(), point_a.timestamp);
                    if !checked_pairs.insert(pair_key) {
                        continue;
                    }

                    let horizontal_nm =
                        great_circle_nm((point_a.lat, point_a.lon), (point_b.lat, point_b.lon));
                    let vertical_ft = (point_a.altitude_ft - point_b.altitude_ft).abs();
                    if horizontal_nm < HORIZONTAL_THRESHOLD_NM && vertical_ft < VERTICAL_THRESHOLD_FT
                    {
                        raw_hits
                            .entry(pair)
                            .or_default()
                            .push((point_a.timestamp, horizontal_nm, vertical_ft));
                    }
                }
            }
        }
    }

    let mut conflicts = Vec::new();
    for (pair, mut hits) in raw_hits {
        hits.sort_by_key(|h| h.0);

        let mut start = hits[0].0;
        let mut end = hits[0].0;
        let mut min_h = hits[0].1;
        let mut min_v = hits[0].2;

        for &(timestamp, horiz, vert) in &hits[1..] {
            if timestamp <= end + time_bin_sec {
                end = timestamp;
                min_h = min_h.min(horiz);
                min_v = min_v.min(vert);
            } else {
                conflicts.push(ConflictEvent {
                    flight_a: pair.0.clone(),
                    flight_b: pair.1.clone(),
                    start_time: start,
                    end_time: end + time_bin_sec,
                    min_horizontal_nm: round4(min_h),
                    min_vertical_ft: min_v,
                    severity: severity(min_h, min_v),
                });
                start = timestamp;
                end = timestamp;
                min_h = horiz;
                min_v = vert;
            }
        }

        conflicts.push(ConflictEvent {
            flight_a: pair.0,
            flight_b: pair.1,
            start_time: start,
            end_time: end + time_bin_sec,
            min_horizontal_nm: round4(min_h),
            min_vertical_ft: min_v,
            severity: severity(min_h, min_v),
        });
    }

    conflicts.sort_by(|a, b| b.severity.partial_cmp(&a.severity).unwrap());
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(acid: &str, lat: f64, lon: f64, altitude_ft: i64, timestamp: i64) -> TrajectoryPoint {
        TrajectoryPoint {
            acid: acid.to_string(),
            lat,
            lon,
            altitude_ft,
            timestamp,
            speed_kt: 450,
        }
    }

    #[test]
    fn head_on_crossing_is_detected() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![point("FL1", 40.0, -90.0, 35_000, 0)],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![point("FL2", 40.01, -90.0, 35_500, 0)],
        );

        let conflicts = detect_conflicts(&trajectories, 60, 1.0);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].flight_a, "FL1");
        assert_eq!(conflicts[0].flight_b, "FL2");
    }

    #[test]
    fn vertical_clearance_prevents_conflict() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![point("FL1", 40.0, -90.0, 30_000, 0)],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![point("FL2", 40.0, -90.0, 34_000, 0)],
        );

        let conflicts = detect_conflicts(&trajectories, 60, 1.0);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn parallel_tracks_far_apart_do_not_conflict() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![point("FL1", 10.0, 10.0, 30_000, 0)],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![point("FL2", 20.0, 20.0, 30_000, 0)],
        );

        let conflicts = detect_conflicts(&trajectories, 60, 1.0);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn consecutive_hits_coalesce_into_one_event() {
        let mut trajectories = BTreeMap::new();
        let mut fl1 = Vec::new();
        let mut fl2 = Vec::new();
        for i in 0..5 {
            let t = i * 60;
            fl1.push(point("FL1", 40.0, -90.0, 35_000, t));
            fl2.push(point("FL2", 40.001, -90.0, 35_100, t));
        }
        trajectories.insert("FL1".to_string(), fl1);
        trajectories.insert("FL2".to_string(), fl2);

        let conflicts = detect_conflicts(&trajectories, 60, 1.0);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].start_time, 0);
        assert_eq!(conflicts[0].end_time, 4 * 60 + 60);
    }

    #[test]
    fn gap_larger_than_bin_splits_into_two_events() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![
                point("FL1", 40.0, -90.0, 35_000, 0),
                point("FL1", 40.0, -90.0, 35_000, 600),
            ],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![
                point("FL2", 40.001, -90.0, 35_100, 0),
                point("FL2", 40.001, -90.0, 35_100, 600),
            ],
        );

        let conflicts = detect_conflicts(&trajectories, 60, 1.0);
        assert_eq!(conflicts.len(), 2);
    }
}
