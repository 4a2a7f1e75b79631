//! Catalog filtering.
//!
//! Every criterion is optional and an inactive criterion admits everything. An active
//! criterion never admits a record that lacks the value it tests.
use serde::{Deserialize, Serialize};

use crate::{catalog::DebrisRecord, constants::Degree, geodetic::GeodeticPoint};

/// Closed numeric interval, either bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        RangeFilter { min, max }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn admits(&self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstellationFilter {
    #[default]
    All,
    Member,
    NonMember,
}

impl ConstellationFilter {
    pub fn admits(&self, record: &DebrisRecord) -> bool {
        match self {
            ConstellationFilter::All => true,
            ConstellationFilter::Member => record.in_constellation(),
            ConstellationFilter::NonMember => !record.in_constellation(),
        }
    }
}

/// Latitude/longitude box on the impact site.
///
/// When both longitude bounds are given and `lon_min > lon_max`, the box crosses the
/// antimeridian: it admits `lon ≥ lon_min` or `lon ≤ lon_max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaFilter {
    pub lat_min: Option<Degree>,
    pub lat_max: Option<Degree>,
    pub lon_min: Option<Degree>,
    pub lon_max: Option<Degree>,
}

impl AreaFilter {
    /// Box spanned by two opposite corners of a rubber-band selection.
    pub fn from_corners(a: GeodeticPoint, b: GeodeticPoint) -> Self {
        AreaFilter {
            lat_min: Some(a.latitude.min(b.latitude)),
            lat_max: Some(a.latitude.max(b.latitude)),
            lon_min: Some(a.longitude.min(b.longitude)),
            lon_max: Some(a.longitude.max(b.longitude)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.lat_min.is_some()
            || self.lat_max.is_some()
            || self.lon_min.is_some()
            || self.lon_max.is_some()
    }

    pub fn admits(&self, site: Option<GeodeticPoint>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(GeodeticPoint {
            latitude: lat,
            longitude: lon,
        }) = site
        else {
            return false;
        };

        if !RangeFilter::new(self.lat_min, self.lat_max).admits(Some(lat)) {
            return false;
        }
        match (self.lon_min, self.lon_max) {
            (Some(min), Some(max)) if min > max => lon >= min || lon <= max,
            (min, max) => RangeFilter::new(min, max).admits(Some(lon)),
        }
    }
}

/// Conjunction of all criteria of the map's filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub country: Option<String>,
    /// ISO dates, compared as text with the record date.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub inclination: RangeFilter,
    pub orbit_mass: RangeFilter,
    pub object_class: Option<String>,
    pub constellation: ConstellationFilter,
    pub area: AreaFilter,
}

impl CatalogFilter {
    pub fn admits(&self, record: &DebrisRecord) -> bool {
        fn same(wanted: &Option<String>, value: &Option<String>) -> bool {
            match wanted.as_deref() {
                None | Some("") => true,
                Some(wanted) => value.as_deref() == Some(wanted),
            }
        }
        let date = record.date.as_deref();
        let after_start = match self.date_from.as_deref() {
            None | Some("") => true,
            Some(from) => date.is_some_and(|d| d >= from),
        };
        let before_end = match self.date_to.as_deref() {
            None | Some("") => true,
            Some(to) => date.is_some_and(|d| d <= to),
        };

        same(&self.country, &record.country)
            && after_start
            && before_end
            && self.inclination.admits(record.orbit_inclination)
            && self.orbit_mass.admits(record.mass_in_orbit)
            && same(&self.object_class, &record.object_class)
            && self.constellation.admits(record)
            && self.area.admits(record.impact_site())
    }
}
