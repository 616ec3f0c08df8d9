//! Geofence classification.
//!
//! Pure: no I/O, never fails. An out-of-range result is only advisory;
//! the recorder decides how to annotate it.

use crate::models::geo::{GeoFenceResult, GeoPoint};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default in-range threshold, inclusive.
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Great-circle distance in meters between two points.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// `distance <= threshold` counts as inside the fence.
pub fn within(distance: f64, threshold_m: f64) -> bool {
    distance <= threshold_m
}

/// Classify a worker position against a project site.
///
/// A project without registered coordinates, or a device without a fix,
/// yields `distance = None, within_range = true`.
pub fn classify(
    worker: Option<GeoPoint>,
    site: Option<GeoPoint>,
    threshold_m: f64,
) -> GeoFenceResult {
    match (worker, site) {
        (Some(w), Some(s)) => {
            let d = distance_meters(w, s);
            GeoFenceResult {
                distance_meters: Some(d),
                within_range: within(d, threshold_m),
            }
        }
        _ => GeoFenceResult::unknown(),
    }
}
