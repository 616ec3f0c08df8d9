use super::geo::GeoPoint;
use serde::Serialize;

/// A worksite. `site` is `None` when no coordinates were registered,
/// in which case check actions are never geofenced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub site: Option<GeoPoint>,
}
