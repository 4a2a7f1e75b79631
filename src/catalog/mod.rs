//! # Reentry catalog
//!
//! Records of reentered objects as kept in the catalog JSON file, with the helpers the
//! map layer needs: impact site lookup across the historically used coordinate keys,
//! reentered mass, era band of the marker, constellation membership and filtering.
//!
//! ## Overview
//!
//! The file is a JSON array of objects written by hand over the years, so numeric fields
//! may hold numbers, numeric strings, empty strings or `null`. All of them decode to
//! `Option<f64>`; a value that does not read as a number is absent, never zero.
//!
//! ## Example
//!
//! ```rust, no_run
//! use reentry::catalog::{Catalog, CatalogFilter};
//!
//! let catalog = Catalog::load_or_empty("data/debris.json");
//! let filter = CatalogFilter { country: Some("US".into()), ..CatalogFilter::default() };
//! println!("{} objects", catalog.filter(&filter).count());
//! ```
pub mod filter;
mod lenient;

use std::{fs::File, io::BufReader, io::Read, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{constants::Degree, geodetic::GeodeticPoint, reentry_errors::ReentryError};

pub use filter::{AreaFilter, CatalogFilter, ConstellationFilter, RangeFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactCoordinates {
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<Degree>,
}

/// One reentered object.
///
/// The coordinate fields beside `impact` hold the alternative spellings found in older
/// catalog entries; [`DebrisRecord::impact_site`] resolves them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebrisRecord {
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "pais", default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(rename = "clase_objeto", default, deserialize_with = "lenient::text")]
    pub object_class: Option<String>,
    /// ISO 8601 reentry date.
    #[serde(rename = "fecha", default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(rename = "masa_en_orbita", default, deserialize_with = "lenient::number")]
    pub mass_in_orbit: Option<f64>,
    #[serde(rename = "tamano_caida_kg", default, deserialize_with = "lenient::number")]
    pub fallen_mass_kg: Option<f64>,
    #[serde(rename = "masa_reingresada_kg", default, deserialize_with = "lenient::number")]
    pub reentered_mass_kg: Option<f64>,
    #[serde(rename = "masa_reingreso_kg", default, deserialize_with = "lenient::number")]
    pub reentry_mass_kg: Option<f64>,
    #[serde(rename = "masa_reentrada", default, deserialize_with = "lenient::number")]
    pub reentry_mass: Option<f64>,
    #[serde(rename = "masa_reentrada_kg", default, deserialize_with = "lenient::number")]
    pub reentry_mass_kg_alt: Option<f64>,
    #[serde(rename = "material_principal", default, deserialize_with = "lenient::text")]
    pub main_material: Option<String>,
    /// Degrees.
    #[serde(rename = "inclinacion_orbita", default, deserialize_with = "lenient::number")]
    pub orbit_inclination: Option<f64>,
    #[serde(rename = "imagen", default, deserialize_with = "lenient::text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tle1: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tle2: Option<String>,
    /// Days between the last TLE epoch and the reentry.
    #[serde(rename = "dias_diferencia", default, deserialize_with = "lenient::number")]
    pub tle_age_days: Option<f64>,
    /// Semi-major axis, km.
    #[serde(rename = "a", default, deserialize_with = "lenient::number")]
    pub semi_major_axis: Option<f64>,
    /// Apogee altitude, km.
    #[serde(rename = "apogeo", default, deserialize_with = "lenient::number")]
    pub apogee: Option<f64>,
    /// Perigee altitude, km.
    #[serde(rename = "perigeo", default, deserialize_with = "lenient::number")]
    pub perigee: Option<f64>,
    #[serde(rename = "constelacion", default, deserialize_with = "lenient::text")]
    pub constellation: Option<String>,
    #[serde(rename = "lugar_caida", default)]
    pub impact: Option<ImpactCoordinates>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub latitud: Option<Degree>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitud: Option<Degree>,
    #[serde(rename = "Lat", default, deserialize_with = "lenient::number")]
    pub lat_capitalized: Option<Degree>,
    #[serde(rename = "Lon", default, deserialize_with = "lenient::number")]
    pub lon_capitalized: Option<Degree>,
}

/// Age class of a reentry, which picks the marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EraBand {
    /// 2004 to 2010
    Early,
    /// 2011 to 2017
    Middle,
    /// 2018 to 2025
    Recent,
    Other,
}

impl EraBand {
    pub fn from_year(year: Option<i32>) -> Self {
        match year {
            Some(2004..=2010) => EraBand::Early,
            Some(2011..=2017) => EraBand::Middle,
            Some(2018..=2025) => EraBand::Recent,
            _ => EraBand::Other,
        }
    }
}

impl DebrisRecord {
    /// Known impact site, each axis resolved through the key chain
    /// `lugar_caida`, `lat/lon`, `latitude/longitude`, `latitud/longitud`, `Lat/Lon`.
    pub fn impact_site(&self) -> Option<GeodeticPoint> {
        let impact = self.impact.unwrap_or_default();
        let latitude = impact
            .lat
            .or(self.lat)
            .or(self.latitude)
            .or(self.latitud)
            .or(self.lat_capitalized)?;
        let longitude = impact
            .lon
            .or(self.lon)
            .or(self.longitude)
            .or(self.longitud)
            .or(self.lon_capitalized)?;
        Some(GeodeticPoint::new(latitude, longitude))
    }

    /// First mass found among the reentered-mass keys, falling back to the fallen and
    /// in-orbit masses. `None` when the record gives no mass at all.
    pub fn reentered_mass_kg(&self) -> Option<f64> {
        self.reentered_mass_kg
            .or(self.reentry_mass_kg)
            .or(self.reentry_mass)
            .or(self.reentry_mass_kg_alt)
            .or(self.fallen_mass_kg)
            .or(self.mass_in_orbit)
    }

    pub fn has_orbital_data(&self) -> bool {
        self.tle1.is_some() && self.tle2.is_some()
    }

    /// Hours between the last TLE and the reentry, for the stale-data warning.
    pub fn tle_age_hours(&self) -> Option<f64> {
        self.tle_age_days.map(|days| days * 24.0)
    }

    pub fn year(&self) -> Option<i32> {
        self.date.as_deref()?.get(0..4)?.parse().ok()
    }

    pub fn era_band(&self) -> EraBand {
        EraBand::from_year(self.year())
    }

    pub fn in_constellation(&self) -> bool {
        match self.constellation.as_deref() {
            None => false,
            Some(value) => {
                let value = value.to_lowercase();
                !value.is_empty() && value != "no" && value != "noconstelacion"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Points,
    Heatmap,
}

/// Rendering parameters of the heatmap layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapStyle {
    pub radius: f64,
    pub blur: f64,
    pub min_opacity: f64,
    pub max: f64,
    /// `(stop, color)` pairs, stops increasing in `(0, 1]`.
    pub gradient: Vec<(f64, String)>,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        HeatmapStyle {
            radius: 30.0,
            blur: 25.0,
            min_opacity: 0.4,
            max: 30.0,
            gradient: vec![
                (0.1, "blue".into()),
                (0.3, "lime".into()),
                (0.6, "yellow".into()),
                (1.0, "red".into()),
            ],
        }
    }
}

/// Point marker of the map layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapMarker<'a> {
    pub record: &'a DebrisRecord,
    pub position: GeodeticPoint,
    pub era: EraBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MapLayer<'a> {
    Points { markers: Vec<MapMarker<'a>> },
    Heatmap {
        points: Vec<GeodeticPoint>,
        style: HeatmapStyle,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<DebrisRecord>,
}

impl Catalog {
    pub fn new(records: Vec<DebrisRecord>) -> Self {
        Catalog { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReentryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReentryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReentryError> {
        let file = File::open(path)?;
        Catalog::from_reader(BufReader::new(file))
    }

    /// Read the catalog, or an empty one when the file cannot be read or decoded.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Catalog::from_path(path) {
            Ok(catalog) => {
                debug!(path = %path.display(), records = catalog.len(), "catalog loaded");
                catalog
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "unable to load catalog, using an empty one"
                );
                Catalog::default()
            }
        }
    }

    pub fn records(&self) -> &[DebrisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter<'a>(
        &'a self,
        filter: &'a CatalogFilter,
    ) -> impl Iterator<Item = &'a DebrisRecord> + 'a {
        self.records.iter().filter(move |r| filter.admits(r))
    }

    pub fn distinct_countries(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.country.as_deref()))
    }

    pub fn distinct_classes(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.object_class.as_deref()))
    }

    /// Impact sites of the filtered records, records without a site left out.
    pub fn heat_points(&self, filter: &CatalogFilter) -> Vec<GeodeticPoint> {
        self.filter(filter).filter_map(DebrisRecord::impact_site).collect()
    }

    pub fn markers<'a>(&'a self, filter: &'a CatalogFilter) -> Vec<MapMarker<'a>> {
        self.filter(filter)
            .filter_map(|record| {
                Some(MapMarker {
                    record,
                    position: record.impact_site()?,
                    era: record.era_band(),
                })
            })
            .collect()
    }

    pub fn layer<'a>(&'a self, filter: &'a CatalogFilter, mode: DisplayMode) -> MapLayer<'a> {
        match mode {
            DisplayMode::Points => MapLayer::Points {
                markers: self.markers(filter),
            },
            DisplayMode::Heatmap => MapLayer::Heatmap {
                points: self.heat_points(filter),
                style: HeatmapStyle::default(),
            },
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .sorted_unstable()
        .dedup()
        .collect()
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    const CATALOG: &str = r#"[
        {"nombre": "A", "pais": "US", "clase_objeto": "Payload", "fecha": "2009-05-01",
         "lugar_caida": {"lat": "10.5", "lon": 20}, "masa_reingreso_kg": "150"},
        {"nombre": "B", "pais": "RU", "clase_objeto": "Rocket Body", "fecha": "2015-11-20",
         "latitud": -33.0, "longitud": 151.0, "dias_diferencia": 0.5},
        {"nombre": "C", "pais": "US", "clase_objeto": "", "fecha": "2024-02-21",
         "Lat": 1.0, "Lon": "", "masa_en_orbita": 2000},
        {"nombre": "D", "pais": "", "fecha": "1998", "latitude": 45, "longitude": -75,
         "constelacion": "Iridium", "tle1": "x", "tle2": "y"}
    ]"#;

    #[test]
    fn test_decode_catalog() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 4);

        let records = catalog.records();
        assert_eq!(records[0].impact_site(), Some(GeodeticPoint::new(10.5, 20.0)));
        assert_eq!(records[1].impact_site(), Some(GeodeticPoint::new(-33.0, 151.0)));
        assert_eq!(records[2].impact_site(), None);
        assert_eq!(records[3].impact_site(), Some(GeodeticPoint::new(45.0, -75.0)));

        assert_eq!(records[0].reentered_mass_kg(), Some(150.0));
        assert_eq!(records[1].reentered_mass_kg(), None);
        assert_eq!(records[2].reentered_mass_kg(), Some(2000.0));

        assert_eq!(records[1].tle_age_hours(), Some(12.0));
        assert_eq!(records[0].tle_age_hours(), None);
        assert!(records[3].has_orbital_data());
        assert!(!records[0].has_orbital_data());
        assert!(records[3].in_constellation());
        assert!(!records[0].in_constellation());
    }

    #[test]
    fn test_era_bands() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let eras: Vec<_> = catalog.records().iter().map(DebrisRecord::era_band).collect();
        assert_eq!(
            eras,
            vec![EraBand::Early, EraBand::Middle, EraBand::Recent, EraBand::Other]
        );
        assert_eq!(EraBand::from_year(Some(2026)), EraBand::Other);
        assert_eq!(EraBand::from_year(None), EraBand::Other);
    }

    #[test]
    fn test_constellation_values() {
        let with = |value: &str| DebrisRecord {
            constellation: Some(value.into()),
            ..DebrisRecord::default()
        };
        assert!(with("Starlink").in_constellation());
        assert!(!with("NO").in_constellation());
        assert!(!with("NoConstelacion").in_constellation());
        assert!(!DebrisRecord::default().in_constellation());
    }

    #[test]
    fn test_distinct_values() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.distinct_countries(), vec!["RU", "US"]);
        assert_eq!(catalog.distinct_classes(), vec!["Payload", "Rocket Body"]);
    }

    #[test]
    fn test_layers() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let everything = CatalogFilter::default();
        assert_eq!(catalog.heat_points(&everything).len(), 3);

        match catalog.layer(&everything, DisplayMode::Points) {
            MapLayer::Points { markers } => {
                assert_eq!(markers.len(), 3);
                assert_eq!(markers[1].era, EraBand::Middle);
                assert_eq!(markers[1].record.name.as_deref(), Some("B"));
            }
            other => panic!("unexpected layer {other:?}"),
        }
        match catalog.layer(&everything, DisplayMode::Heatmap) {
            MapLayer::Heatmap { points, style } => {
                assert_eq!(points.len(), 3);
                assert_eq!(style.radius, 30.0);
                assert_eq!(style.gradient.len(), 4);
            }
            other => panic!("unexpected layer {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_catalog_is_empty() {
        assert!(Catalog::load_or_empty("/nonexistent/debris.json").is_empty());
        assert!(matches!(
            Catalog::from_path("/nonexistent/debris.json"),
            Err(ReentryError::IoError(_))
        ));
        assert!(matches!(
            Catalog::from_json_str("{\"not\": \"an array\"}"),
            Err(ReentryError::JsonDecode(_))
        ));
    }
}
