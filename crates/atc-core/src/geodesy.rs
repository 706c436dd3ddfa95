//! Geodesy primitives shared by trajectory sampling, conflict detection, and
//! hotspot bucketing. Pure functions of their inputs; no state.

/// Earth radius in nautical miles, matching the rest of the separation
/// thresholds (which are expressed in nm).
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance between two (lat, lon) points in decimal degrees,
/// returned in nautical miles.
///
/// Uses the haversine formula, clamping the argument to `asin` so that
/// floating-point drift on near-antipodal or identical points never
/// produces a NaN.
pub fn great_circle_nm(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;

    2.0 * EARTH_RADIUS_NM * h.sqrt().min(1.0).asin()
}

/// Linear chord interpolation between two points at fraction `t`.
///
/// This is a deliberate simplification: it interpolates along the straight
/// chord between `a` and `b`, not along the true great-circle arc. That is
/// fine for the short sample intervals this core uses, since downstream
/// consumers only feed the result into grid bucketing, but it degrades
/// over long oceanic-scale segments and is out of scope to fix here.
pub fn interpolate(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}
