use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::{constants::Degree, geodetic::GeodeticPoint};

/// Latitude/longitude box enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackBounds {
    pub south: Degree,
    pub west: Degree,
    pub north: Degree,
    pub east: Degree,
}

impl TrackBounds {
    /// Smallest box holding every point, `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeodeticPoint> + Clone,
    {
        let (south, north) = min_max(points.clone().into_iter().map(|p| p.latitude))?;
        let (west, east) = min_max(points.into_iter().map(|p| p.longitude))?;
        Some(TrackBounds {
            south,
            west,
            north,
            east,
        })
    }

    pub fn center(&self) -> GeodeticPoint {
        GeodeticPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeodeticPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

fn min_max(values: impl Iterator<Item = Degree>) -> Option<(Degree, Degree)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

/// How a 2D map view should frame a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackExtent {
    /// Fit the map to the bounds of every drawn point.
    Fit { bounds: TrackBounds, padding_px: u32 },
    /// Nothing to draw: center on the known impact site.
    Fallback { center: GeodeticPoint, zoom: u8 },
    /// Nothing to draw and no impact site known.
    World,
}
