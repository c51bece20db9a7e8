//! Great-circle distance between coordinates.
//!
//! The planner never routes over a road network; straight-line haversine
//! distance divided by a technician's average speed is the travel-time proxy
//! used everywhere (greedy assignment, scoring, optimizer refresh, commit).

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Legs longer than a week of driving are treated as unreachable.
const MAX_TRAVEL_SECONDS: f64 = 7.0 * 86_400.0;

/// Calculate haversine distance between two points in kilometers.
///
/// Points are `(lat, lng)` in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Convert a distance in km to travel time in whole seconds.
///
/// Returns `None` when the speed cannot move the technician at all
/// (zero, negative or non-finite) or the leg would take more than a week,
/// which callers treat as unreachable.
pub fn travel_seconds(km: f64, speed_kmh: f64) -> Option<i32> {
    if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return None;
    }
    let seconds = (km / speed_kmh * 3600.0).round();
    if !seconds.is_finite() || seconds > MAX_TRAVEL_SECONDS {
        return None;
    }
    Some(seconds as i32)
}
