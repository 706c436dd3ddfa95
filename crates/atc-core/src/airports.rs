//! Airport coordinate lookup.
//!
//! The core depends only on the `AirportLookup` interface, not on any
//! particular table. `StaticAirportTable` ships a default so the crate is
//! usable standalone and in tests, but production callers are free to
//! inject their own (e.g. backed by a real navdata database).

use std::collections::HashMap;

/// Resolves an uppercase ICAO/IATA code to (lat, lon) in decimal degrees.
///
/// `Sync` so a single lookup can be shared across the trajectory-building
/// worker pool.
pub trait AirportLookup: Sync {
    fn coords(&self, code: &str) -> Option<(f64, f64)>;
}

/// A fixed, in-memory coordinate table treated as injected data.
#[derive(Debug, Clone)]
pub struct StaticAirportTable {
    coords: HashMap<String, (f64, f64)>,
}

impl StaticAirportTable {
    pub fn new(coords: HashMap<String, (f64, f64)>) -> Self {
        Self { coords }
    }

    /// The Canadian airport set used by this system's reference deployment.
    pub fn canadian() -> Self {
        let mut coords = HashMap::new();
        for (code, lat, lon) in CANADIAN_AIRPORTS {
            coords.insert((*code).to_string(), (*lat, *lon));
        }
        Self { coords }
    }
}

impl Default for StaticAirportTable {
    fn default() -> Self {
        Self::canadian()
    }
}

impl AirportLookup for StaticAirportTable {
    fn coords(&self, code: &str) -> Option<(f64, f64)> {
        self.coords.get(&code.trim().to_uppercase()).copied()
    }
}

/// (ICAO code, lat, lon) for major and secondary Canadian airports.
const CANADIAN_AIRPORTS: &[(&str, f64, f64)] = &[
    ("CYYZ", 43.6777, -79.6248),
    ("CYVR", 49.1947, -123.1839),
    ("CYUL", 45.4706, -73.7408),
    ("CYOW", 45.3225, -75.6692),
    ("CYYC", 51.1225, -114.0139),
    ("CYEG", 53.3097, -113.5797),
    ("CYWG", 49.9100, -97.2399),
    ("CYQB", 46.7911, -71.3933),
    ("CYHZ", 44.8808, -63.5086),
    ("CYXE", 52.1708, -106.6997),
    ("CYQR", 50.4319, -104.6656),
    ("CYYJ", 48.6469, -123.4258),
    ("CYYT", 47.6186, -52.7519),
    ("CYQM", 46.1122, -64.6786),
    ("CYFC", 45.8689, -66.5372),
    ("CYSJ", 45.3161, -65.8903),
    ("CYQI", 43.8269, -66.0881),
    ("CYDF", 49.2108, -57.3914),
    ("CYQX", 48.9369, -54.5681),
    ("CYXY", 60.7096, -135.0674),
    ("CYZF", 62.4628, -114.4403),
    ("CYFB", 63.7561, -68.5558),
    ("CYTZ", 43.6275, -79.3962),
    ("CYOO", 43.9228, -78.8950),
    ("CYKF", 43.4608, -80.3786),
    ("CYXU", 43.0356, -81.1539),
    ("CYHM", 43.1736, -79.9350),
    ("CYAM", 46.4853, -84.5094),
    ("CYQA", 44.9747, -79.3033),
    ("CYTS", 48.5697, -81.3767),
    ("CYVO", 48.0533, -77.7828),
    ("CYMX", 45.6795, -74.0387),
    ("CYHU", 45.5175, -73.4169),
    ("CYQY", 46.1614, -60.0478),
    ("CYPR", 54.2861, -130.4447),
    ("CYXS", 53.8894, -122.6789),
    ("CYKA", 50.7022, -120.4444),
    ("CYLW", 49.9561, -119.3778),
    ("CYCD", 49.0522, -123.8700),
    ("CYXX", 49.0253, -122.3608),
    ("CYBL", 49.9508, -125.2708),
    ("CYXC", 49.6108, -115.7822),
    ("CYYF", 49.4631, -119.6022),
    ("CYQQ", 49.7108, -124.8867),
    ("CYZT", 50.6806, -127.3667),
];
