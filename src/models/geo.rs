use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting values outside the valid lat/lon ranges.
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Both halves must be present, or neither.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> AppResult<Option<Self>> {
        match (lat, lon) {
            (Some(la), Some(lo)) => Ok(Some(Self::new(la, lo)?)),
            (None, None) => Ok(None),
            _ => Err(AppError::InvalidCoordinate(
                "latitude and longitude must be given together".into(),
            )),
        }
    }

    pub fn display(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Outcome of a geofence classification. Never persisted on its own:
/// it is folded into the record observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoFenceResult {
    pub distance_meters: Option<f64>,
    pub within_range: bool,
}

impl GeoFenceResult {
    /// Fail-open result used when either side has no coordinates.
    pub fn unknown() -> Self {
        Self {
            distance_meters: None,
            within_range: true,
        }
    }
}
