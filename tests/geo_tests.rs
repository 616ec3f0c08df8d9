mod common;
use common::site;
use rtareo::core::geo::{EARTH_RADIUS_M, classify, distance_meters, within};
use rtareo::models::geo::GeoPoint;

/// Point `meters` due north of the seeded site.
fn north_of_site(meters: f64) -> GeoPoint {
    let s = site();
    let dlat = (meters / EARTH_RADIUS_M).to_degrees();
    GeoPoint::new(s.latitude + dlat, s.longitude).unwrap()
}

#[test]
fn test_boundary_is_inclusive() {
    assert!(within(500.0, 500.0));
    assert!(!within(501.0, 500.0));
    assert!(within(0.0, 500.0));
}

#[test]
fn test_distance_is_symmetric_and_zero_on_same_point() {
    let a = site();
    let b = north_of_site(1_000.0);

    assert!(distance_meters(a, a).abs() < 1e-6);
    assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
    assert!((distance_meters(a, b) - 1_000.0).abs() < 0.5);
}

#[test]
fn test_known_city_distance() {
    // Lima → Cusco, roughly 570 km
    let lima = GeoPoint::new(-12.0464, -77.0428).unwrap();
    let cusco = GeoPoint::new(-13.5320, -71.9675).unwrap();
    let d = distance_meters(lima, cusco);
    assert!((560_000.0..585_000.0).contains(&d), "got {d}");
}

#[test]
fn test_classify_in_and_out_of_range() {
    let near = classify(Some(north_of_site(300.0)), Some(site()), 500.0);
    assert!(near.within_range);
    assert!(near.distance_meters.is_some());

    let far = classify(Some(north_of_site(800.0)), Some(site()), 500.0);
    assert!(!far.within_range);
    assert!(far.distance_meters.unwrap() > 500.0);
}

#[test]
fn test_classify_fails_open_without_coordinates() {
    let no_fix = classify(None, Some(site()), 500.0);
    assert_eq!(no_fix.distance_meters, None);
    assert!(no_fix.within_range);

    let no_site = classify(Some(site()), None, 500.0);
    assert_eq!(no_site.distance_meters, None);
    assert!(no_site.within_range);
}

#[test]
fn test_coordinates_are_validated() {
    assert!(GeoPoint::new(91.0, 0.0).is_err());
    assert!(GeoPoint::new(0.0, -180.5).is_err());
    assert!(GeoPoint::from_parts(Some(1.0), None).is_err());
    assert_eq!(GeoPoint::from_parts(None, None).unwrap(), None);
}
