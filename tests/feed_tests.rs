// Host-side tests for decoding the hit feed.

use globe_fx::effects::HitKind;
use globe_fx::error::FeedError;
use globe_fx::feed::{FeedLog, HitRecord};
use globe_fx::render::HeadlessRenderer;
use globe_fx::{FrameDriver, SceneConfig};

#[test]
fn accepts_numbers_and_numeric_strings() {
    let r = HitRecord::parse(r#"{"lat": 12.5, "long": "-45", "kind": "READ", "label": "db-7"}"#)
        .expect("valid record");
    assert_eq!(r.lat, 12.5);
    assert_eq!(r.long, -45.0);
    assert_eq!(r.kind, HitKind::Read);
    assert_eq!(r.log_line(), "read @ 12.50, -45.00 db-7");
}

#[test]
fn unknown_or_missing_kind_is_other() {
    let r = HitRecord::parse(r#"{"lat": 0, "long": 0, "kind": "write"}"#).unwrap();
    assert_eq!(r.kind, HitKind::Other);
    let r = HitRecord::parse(r#"{"lat": 0, "long": 0}"#).unwrap();
    assert_eq!(r.kind, HitKind::Other);
    assert_eq!(r.log_line(), "other @ 0.00, 0.00");
}

#[test]
fn rejects_non_numeric_coordinates() {
    let err = HitRecord::parse(r#"{"lat": "north", "long": 3}"#).unwrap_err();
    assert!(matches!(err, FeedError::NonNumeric { field: "lat" }));
    let err = HitRecord::parse(r#"{"lat": 1, "long": null}"#).unwrap_err();
    assert!(matches!(err, FeedError::NonNumeric { field: "long" }));
}

#[test]
fn rejects_out_of_range_coordinates() {
    let err = HitRecord::parse(r#"{"lat": 91, "long": 0}"#).unwrap_err();
    assert!(matches!(err, FeedError::OutOfRange { field: "lat", .. }));
    let err = HitRecord::parse(r#"{"lat": 0, "long": -180.5}"#).unwrap_err();
    assert!(matches!(err, FeedError::OutOfRange { field: "long", .. }));
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        HitRecord::parse("{lat: 1"),
        Err(FeedError::Json(_))
    ));
    assert!(matches!(HitRecord::parse(r#"{"lat": 1}"#), Err(FeedError::Json(_))));
}

#[test]
fn log_keeps_only_the_newest_lines() {
    let mut log = FeedLog::with_capacity(3);
    for i in 0..5 {
        log.push(format!("line {i}"));
    }
    assert_eq!(log.len(), 3);
    assert_eq!(log.lines().collect::<Vec<_>>(), ["line 2", "line 3", "line 4"]);
}

#[test]
fn ingest_spawns_marker_and_logs() {
    let mut d = FrameDriver::new(SceneConfig::default(), HeadlessRenderer::new(), 3);
    let record = HitRecord::parse(r#"{"lat": -30, "long": 150, "kind": "read"}"#).unwrap();
    d.ingest(&record);
    assert_eq!(d.sim.markers.len(), 1);
    assert_eq!(d.sim.feed_log.len(), 1);
    assert_eq!(d.sim.feed_log.lines().next(), Some("read @ -30.00, 150.00"));
}
