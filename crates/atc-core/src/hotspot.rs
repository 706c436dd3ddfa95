//! Congestion hotspot aggregation over a 4D lat/lon/altitude/time grid.

use crate::models::{HotspotCell, TrajectoryPoint};
use std::collections::{BTreeMap, BTreeSet};
use std::env;

/// Bucketing and output parameters for [`detect_hotspots`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotspotConfig {
    pub lat_bucket_deg: f64,
    pub lon_bucket_deg: f64,
    pub altitude_band_ft: i64,
    pub time_bin_sec: i64,
    pub top_n: usize,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            lat_bucket_deg: 1.0,
            lon_bucket_deg: 1.0,
            altitude_band_ft: 2000,
            time_bin_sec: 60,
            top_n: 10,
        }
    }
}

impl HotspotConfig {
    /// Override each field from the environment, falling back to
    /// [`HotspotConfig::default`] per-field when a variable is unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            lat_bucket_deg: env::var("ATC_HOTSPOT_LAT_BUCKET_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.lat_bucket_deg),
            lon_bucket_deg: env::var("ATC_HOTSPOT_LON_BUCKET_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.lon_bucket_deg),
            altitude_band_ft: env::var("ATC_HOTSPOT_ALTITUDE_BAND_FT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.altitude_band_ft),
            time_bin_sec: env::var("ATC_HOTSPOT_TIME_BIN_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.time_bin_sec),
            top_n: env::var("ATC_HOTSPOT_TOP_N")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.top_n),
        }
    }
}

fn bucket(value: f64, step: f64) -> i64 {
    (value / step).floor() as i64
}

#[derive(Default)]
struct CellStats {
    peak_density: i64,
    time_bins: BTreeSet<i64>,
    flights: BTreeSet<String>,
}

/// Aggregate every trajectory point into lat/lon/altitude/time cells, then
/// collapse the time dimension into per-cell occupancy statistics.
///
/// A cell's `peak_density` is the largest number of aircraft seen together
/// in any single time bin within it, not a sum across bins — a cell that
/// saw 3 flights in one bin and 3 different flights in the next is just as
/// congested as one, not twice as congested.
pub fn detect_hotspots(
    trajectories: &BTreeMap<String, Vec<TrajectoryPoint>>,
    config: &HotspotConfig,
) -> Vec<HotspotCell> {
    let mut occupancy: BTreeMap<(i64, i64, i64, i64), Vec<&TrajectoryPoint>> = BTreeMap::new();

    for points in trajectories.values() {
        for point in points {
            let key = (
                bucket(point.lat, config.lat_bucket_deg),
                bucket(point.lon, config.lon_bucket_deg),
                bucket(point.altitude_ft as f64, config.altitude_band_ft as f64),
                point.timestamp.div_euclid(config.time_bin_sec),
            );
            occupancy.entry(key).or_default().push(point);
        }
    }

    let mut cell_stats: BTreeMap<(i64, i64, i64), CellStats> = BTreeMap::new();
    for ((lat_b, lon_b, alt_b, time_bin), points) in &occupancy {
        let stats = cell_stats.entry((*lat_b, *lon_b, *alt_b)).or_default();
        stats.peak_density = stats.peak_density.max(points.len() as i64);
        stats.time_bins.insert(*time_bin);
        stats.flights.extend(points.iter().map(|p| p.acid.clone()));
    }

    let mut hotspots: Vec<HotspotCell> = cell_stats
        .into_iter()
        .filter_map(|((lat_bucket, lon_bucket, altitude_band), stats)| {
            let first_bin = *stats.time_bins.iter().next()?;
            let last_bin = *stats.time_bins.iter().next_back()?;

            let time_start = first_bin * config.time_bin_sec;
            let time_end = (last_bin + 1) * config.time_bin_sec;
            let occupancy_minutes = stats.time_bins.len() as i64 * (config.time_bin_sec / 60);
            let unique_flights = stats.flights.len() as i64;
            let peak_density = stats.peak_density;

            let score = peak_density as f64 * 0.6
                + unique_flights as f64 * 0.3
                + occupancy_minutes as f64 * 0.1;

            Some(HotspotCell {
                lat_bucket,
                lon_bucket,
                altitude_band,
                time_start,
                time_end,
                peak_density,
                occupancy_minutes,
                unique_flights,
                score: (score * 10_000.0).round() / 10_000.0,
            })
        })
        .collect();

    hotspots.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    hotspots.truncate(config.top_n);
    hotspots
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
    fn single_busy_cell_scores_above_empty_airspace() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![point("FL1", 40.5, -90.5, 35_500, 0)],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![point("FL2", 40.6, -90.6, 35_600, 0)],
        );
        trajectories.insert(
            "FL3".to_string(),
            vec![point("FL3", 80.5, 10.5, 10_500, 0)],
        );

        let hotspots = detect_hotspots(&trajectories, &HotspotConfig::default());
        assert_eq!(hotspots[0].lat_bucket, 40);
        assert_eq!(hotspots[0].lon_bucket, -91);
        assert_eq!(hotspots[0].unique_flights, 2);
    }

    #[test]
    fn peak_density_is_the_max_single_bin_count_not_a_sum() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(
            "FL1".to_string(),
            vec![
                point("FL1", 40.5, -90.5, 35_500, 0),
                point("FL1", 40.5, -90.5, 35_500, 60),
            ],
        );
        trajectories.insert(
            "FL2".to_string(),
            vec![point("FL2", 40.5, -90.5, 35_500, 60)],
        );

        let hotspots = detect_hotspots(&trajectories, &HotspotConfig::default());
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].peak_density, 2);
        assert_eq!(hotspots[0].unique_flights, 2);
        assert_eq!(hotspots[0].occupancy_minutes, 2);
    }

    #[test]
    fn top_n_truncates_result_set() {
        let mut trajectories = BTreeMap::new();
        for i in 0..20 {
            trajectories.insert(
                format!("FL{i}"),
                vec![point(&format!("FL{i}"), i as f64, i as f64, 30_000, 0)],
            );
        }
        let config = HotspotConfig {
            top_n: 3,
            ..HotspotConfig::default()
        };
        let hotspots = detect_hotspots(&trajectories, &config);
        assert_eq!(hotspots.len(), 3);
    }
}
