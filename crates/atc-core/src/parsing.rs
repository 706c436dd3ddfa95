//! Route string parsing: waypoint tokens and single-waypoint expansion.

use crate::airports::AirportLookup;
use crate::error::AnalysisError;

/// A (lat, lon) pair in signed decimal degrees.
pub type Waypoint = (f64, f64);

/// Parse one `<deg>[NS]/<deg>[EW]` token into a signed (lat, lon) pair.
///
/// Matches `^(\d+(\.\d+)?)[NS]/(\d+(\.\d+)?)[EW]$`, case-insensitive,
/// without pulling in a regex engine: the grammar is simple enough to walk
/// by hand, and doing so keeps this leaf dependency-free.
pub fn parse_waypoint(token: &str) -> Option<Waypoint> {
    let token = token.trim();
    let slash = token.find('/')?;
    let (lat_part, lon_part) = (&token[..slash], &token[slash + 1..]);

    let (lat_digits, lat_dir) = split_direction(lat_part, b"NnSs")?;
    let (lon_digits, lon_dir) = split_direction(lon_part, b"EeWw")?;

    let lat_mag: f64 = parse_unsigned_decimal(lat_digits)?;
    let lon_mag: f64 = parse_unsigned_decimal(lon_digits)?;

    let lat = if lat_dir.eq_ignore_ascii_case(&b'S') {
        -lat_mag
    } else {
        lat_mag
    };
    let lon = if lon_dir.eq_ignore_ascii_case(&b'W') {
        -lon_mag
    } else {
        lon_mag
    };

    Some((lat, lon))
}

fn split_direction(part: &str, allowed: &[u8]) -> Option<(&str, u8)> {
    let bytes = part.as_bytes();
    let last = *bytes.last()?;
    if !allowed.contains(&last) {
        return None;
    }
    Some((&part[..part.len() - 1], last))
}

/// Matches `\d+(\.\d+)?` exactly: at least one leading digit, and if a dot
/// is present it must be followed by at least one digit.
fn parse_unsigned_decimal(digits: &str) -> Option<f64> {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    digits.parse::<f64>().ok()
}

/// Parse a whitespace-separated route string into an ordered point list,
/// expanding a single-waypoint route via the airport lookup.
///
/// Errors are attributed to `acid` so the caller can fold them into an
/// `Issue` without losing track of which flight failed.
pub fn parse_route(
    acid: &str,
    route_str: &str,
    departure_airport: Option<&str>,
    arrival_airport: Option<&str>,
    airports: &dyn AirportLookup,
) -> Result<Vec<Waypoint>, AnalysisError> {
    if route_str.trim().is_empty() {
        return Err(AnalysisError::EmptyRoute {
            acid: acid.to_string(),
        });
    }

    let mut points = Vec::new();
    for token in route_str.split_whitespace() {
        let wp = parse_waypoint(token).ok_or_else(|| AnalysisError::InvalidWaypoint {
            acid: acid.to_string(),
            token: token.to_string(),
        })?;
        points.push(wp);
    }

    if points.len() == 1 {
        let dep = departure_airport.and_then(|c| airports.coords(c));
        let arr = arrival_airport.and_then(|c| airports.coords(c));
        points = match (dep, arr) {
            (Some(dep), Some(arr)) => vec![dep, points[0], arr],
            (Some(dep), None) => vec![dep, points[0]],
            (None, Some(arr)) => vec![points[0], arr],
            (None, None) => {
                return Err(AnalysisError::UnexpandableRoute {
                    acid: acid.to_string(),
                })
            }
        };
    }

    if points.len() < 2 {
        return Err(AnalysisError::UnexpandableRoute {
            acid: acid.to_string(),
        });
    }

    Ok(points)
}
