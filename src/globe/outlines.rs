//! Country outlines loaded from GeoJSON
//!
//! Only `Polygon` and `MultiPolygon` geometries are kept; every ring is
//! stored as (lat, lon) pairs in degrees. Other geometry types are skipped.

use serde::Deserialize;
use serde_json::Value;

use super::curves::{Run, split_runs};
use super::projection::{ProjectedPoint, RotationState, project};
use glam::Vec2;

/// Errors while decoding an outline document
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("failed to parse outlines: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("outline document is a {0}, expected a FeatureCollection")]
    NotAFeatureCollection(String),
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Value,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// One closed ring of a country polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub country: Option<String>,
    /// (lat, lon) in degrees
    pub points: Vec<(f32, f32)>,
}

/// Visible pieces of a ring after projection
#[derive(Debug, Clone, PartialEq)]
pub enum RingShape {
    /// Whole ring on the front hemisphere
    Closed(Vec<Vec2>),
    /// Front-facing stretches of a partly hidden ring
    Open(Vec<Vec<Vec2>>),
}

/// Parsed country outlines
#[derive(Debug, Clone, Default)]
pub struct CountryOutlines {
    rings: Vec<Ring>,
}

impl CountryOutlines {
    pub fn from_geojson(json: &str) -> Result<Self, OutlineError> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        if collection.kind != "FeatureCollection" {
            return Err(OutlineError::NotAFeatureCollection(collection.kind));
        }

        let mut rings = Vec::new();
        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let country = feature
                .properties
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned);

            match geometry.kind.as_str() {
                "Polygon" => {
                    let polygon: Vec<Vec<[f64; 2]>> = serde_json::from_value(geometry.coordinates)?;
                    push_polygon(&mut rings, &country, polygon);
                }
                "MultiPolygon" => {
                    let polygons: Vec<Vec<Vec<[f64; 2]>>> =
                        serde_json::from_value(geometry.coordinates)?;
                    for polygon in polygons {
                        push_polygon(&mut rings, &country, polygon);
                    }
                }
                other => log::debug!("Skipping {} geometry", other),
            }
        }

        log::info!("Loaded {} outline rings", rings.len());
        Ok(Self { rings })
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Project every ring and keep only what faces the viewer
    pub fn visible_shapes(
        &self,
        rotation: RotationState,
        center: Vec2,
        radius: f32,
    ) -> Vec<RingShape> {
        let mut shapes = Vec::new();
        for ring in &self.rings {
            let projected: Vec<ProjectedPoint> = ring
                .points
                .iter()
                .map(|&(lat, lon)| project(lat, lon, rotation, center, radius, false))
                .collect();

            if !projected.iter().any(ProjectedPoint::is_front) {
                continue;
            }
            if projected.iter().all(ProjectedPoint::is_front) {
                shapes.push(RingShape::Closed(
                    projected.iter().map(ProjectedPoint::pos).collect(),
                ));
                continue;
            }

            let runs: Vec<Vec<Vec2>> = split_runs(&projected)
                .into_iter()
                .filter(|r| r.front && r.is_drawable())
                .map(|r: Run| r.points)
                .collect();
            if !runs.is_empty() {
                shapes.push(RingShape::Open(runs));
            }
        }
        shapes
    }
}

fn push_polygon(rings: &mut Vec<Ring>, country: &Option<String>, polygon: Vec<Vec<[f64; 2]>>) {
    for ring in polygon {
        if ring.len() < 2 {
            continue;
        }
        rings.push(Ring {
            country: country.clone(),
            // GeoJSON positions are [lon, lat]
            points: ring.iter().map(|p| (p[1] as f32, p[0] as f32)).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[170, 0], [179, 0], [179, 5], [170, 0]]],
                        [[[60, 0], [85, 0], [100, 0], [100, 5], [85, 5], [60, 0]]]
                    ]
                }
            },
            { "type": "Feature", "properties": {}, "geometry": null },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let outlines = CountryOutlines::from_geojson(SQUARE).unwrap();
        assert_eq!(outlines.rings().len(), 3);
        assert_eq!(outlines.rings()[0].country.as_deref(), Some("Squareland"));
        // [lon, lat] becomes (lat, lon)
        assert_eq!(outlines.rings()[0].points[1], (-10.0, 10.0));
    }

    #[test]
    fn rejects_other_documents() {
        let err = CountryOutlines::from_geojson(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, OutlineError::NotAFeatureCollection(_)));
        assert!(matches!(
            CountryOutlines::from_geojson("nope"),
            Err(OutlineError::Parse(_))
        ));
    }

    #[test]
    fn visibility_classifies_rings() {
        let outlines = CountryOutlines::from_geojson(SQUARE).unwrap();
        let shapes = outlines.visible_shapes(RotationState::default(), Vec2::ZERO, 100.0);
        // Square faces the viewer, the 170-179 sliver is hidden,
        // the 60-100 ring straddles the limb
        assert_eq!(shapes.len(), 2);
        assert!(matches!(&shapes[0], RingShape::Closed(pts) if pts.len() == 5));
        assert!(matches!(&shapes[1], RingShape::Open(runs) if runs.len() == 2));
    }
}
