#![allow(dead_code)]

use reentry::{GroundTrack, OrbitalElementSet};

pub const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

pub const VANGUARD_LINE1: &str =
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
pub const VANGUARD_LINE2: &str =
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

pub fn iss() -> OrbitalElementSet {
    OrbitalElementSet::from_tle(Some(ISS_LINE1), Some(ISS_LINE2)).unwrap()
}

pub fn vanguard() -> OrbitalElementSet {
    OrbitalElementSet::from_tle(Some(VANGUARD_LINE1), Some(VANGUARD_LINE2)).unwrap()
}

/// Check the shape every drawn ground track must have.
pub fn assert_track_is_well_formed(track: &GroundTrack, threshold: f64) {
    for segment in &track.segments {
        assert!(segment.len() >= 2, "segment of {} points", segment.len());
        for pair in segment.points().windows(2) {
            let jump = (pair[1].longitude - pair[0].longitude).abs();
            assert!(jump <= threshold, "jump of {jump}° inside a segment");
        }
    }
    for point in track.points() {
        assert!((-90.0..=90.0).contains(&point.latitude));
        assert!(point.longitude > -180.0 && point.longitude <= 180.0);
    }
}
