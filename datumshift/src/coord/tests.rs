//! Tests for coordinate types

use super::*;

#[test]
fn test_point_offset_keeps_height() {
    let p = GeoPoint::with_height(-75.0, 45.0, 120.5);
    let moved = p.offset(0.001, -0.002);

    assert_eq!(moved.lon, -75.0 + 0.001);
    assert_eq!(moved.lat, 45.0 - 0.002);
    assert_eq!(moved.height, Some(120.5));
    // Original untouched
    assert_eq!(p.lon, -75.0);
}

#[test]
fn test_two_dimensional_point_has_no_height() {
    let p = GeoPoint::new(10.0, 20.0);
    assert!(p.height.is_none());
    assert!(p.is_finite());
    assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
}

#[test]
fn test_extent_rejects_inverted_bounds() {
    assert!(GeoExtent::new(-80.0, 40.0, -70.0, 50.0).is_ok());
    assert!(matches!(
        GeoExtent::new(-70.0, 40.0, -80.0, 50.0),
        Err(CoordError::InvalidExtent { .. })
    ));
    assert!(GeoExtent::new(f64::NAN, 40.0, -70.0, 50.0).is_err());
}

#[test]
fn test_extent_contains_is_inclusive() {
    let extent = GeoExtent::new(-80.0, 40.0, -70.0, 50.0).unwrap();

    assert!(extent.contains(&GeoPoint::new(-75.0, 45.0)));
    assert!(extent.contains(&GeoPoint::new(-80.0, 40.0)));
    assert!(extent.contains(&GeoPoint::new(-70.0, 50.0)));
    assert!(!extent.contains(&GeoPoint::new(-69.999, 45.0)));
    assert!(!extent.contains(&GeoPoint::new(f64::NAN, 45.0)));
}

#[test]
fn test_extent_intersects() {
    let a = GeoExtent::new(0.0, 0.0, 10.0, 10.0).unwrap();
    let b = GeoExtent::new(5.0, 5.0, 15.0, 15.0).unwrap();
    let touching = GeoExtent::new(10.0, 0.0, 20.0, 10.0).unwrap();
    let apart = GeoExtent::new(11.0, 11.0, 20.0, 20.0).unwrap();

    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
    assert!(a.intersects(&touching), "shared edges count as intersecting");
    assert!(!a.intersects(&apart));
}

#[test]
fn test_seconds_to_degrees() {
    assert_eq!(seconds_to_degrees(3600.0), 1.0);
    assert_eq!(seconds_to_degrees(-1800.0), -0.5);
}
