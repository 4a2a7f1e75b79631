use serde::Serialize;

use crate::{constants::Degree, geodetic::GeodeticPoint};

/// Contiguous run of ground-track points, drawn as one polyline.
///
/// A segment never holds fewer than the configured minimum of points (2 by default), and
/// two consecutive points never differ by more than the split threshold in longitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrackSegment(Vec<GeodeticPoint>);

impl TrackSegment {
    pub fn points(&self) -> &[GeodeticPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeodeticPoint> {
        self.0.iter()
    }

    /// `[latitude, longitude]` pairs, the usual polyline input of map widgets.
    pub fn lat_lon_pairs(&self) -> Vec<[Degree; 2]> {
        self.0.iter().map(|p| [p.latitude, p.longitude]).collect()
    }
}

impl<'a> IntoIterator for &'a TrackSegment {
    type Item = &'a GeodeticPoint;
    type IntoIter = std::slice::Iter<'a, GeodeticPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Splits a time-ordered stream of points wherever the longitude jumps.
///
/// The point that triggers the split opens the next segment. Runs shorter than
/// `min_points` are dropped.
#[derive(Debug)]
pub struct Segmenter {
    threshold: Degree,
    min_points: usize,
    segments: Vec<TrackSegment>,
    current: Vec<GeodeticPoint>,
    previous_longitude: Option<Degree>,
}

impl Segmenter {
    pub fn new(threshold: Degree, min_points: usize) -> Self {
        Segmenter {
            threshold,
            min_points,
            segments: Vec::new(),
            current: Vec::new(),
            previous_longitude: None,
        }
    }

    pub fn push(&mut self, point: GeodeticPoint) {
        if let Some(previous) = self.previous_longitude {
            if (point.longitude - previous).abs() > self.threshold {
                self.close_current();
            }
        }
        self.current.push(point);
        self.previous_longitude = Some(point.longitude);
    }

    fn close_current(&mut self) {
        let run = std::mem::take(&mut self.current);
        if run.len() >= self.min_points {
            self.segments.push(TrackSegment(run));
        }
    }

    pub fn finish(mut self) -> Vec<TrackSegment> {
        self.close_current();
        self.segments
    }
}
