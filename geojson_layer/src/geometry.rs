//! GeoJSON data model, as defined by [RFC 7946](https://datatracker.ietf.org/doc/html/rfc7946).
//!
//! Only the parts needed for drawing are kept. Geometry types unknown to the RFC do not fail
//! the parsing, they end up as [`Geometry::Unsupported`] and are simply not drawn. The same goes
//! for malformed geometries, e.g. with a position made of a single number, and for malformed
//! members of a feature collection, which are skipped. Only the document as a whole can be
//! rejected.

use std::{borrow::Cow, io::Read, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use walkers::{Position, lon_lat};

/// Error returned when GeoJSON document cannot be parsed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON object has no \"type\" member")]
    MissingType,
}

/// GeoJSON position with less than two numbers.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("position needs at least two numbers, got {0}")]
pub struct InvalidPosition(pub usize);

/// Single GeoJSON position. GeoJSON keeps longitude first, then latitude and optionally
/// altitude, which is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct LonLat(Position);

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(lon_lat(lon, lat))
    }

    pub fn position(self) -> Position {
        self.0
    }

    pub fn longitude(self) -> f64 {
        self.0.x()
    }

    pub fn latitude(self) -> f64 {
        self.0.y()
    }
}

impl From<Position> for LonLat {
    fn from(position: Position) -> Self {
        Self(position)
    }
}

impl TryFrom<Vec<f64>> for LonLat {
    type Error = InvalidPosition;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(InvalidPosition(value.len())),
        }
    }
}

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: LonLat,
    },
    MultiPoint {
        coordinates: Vec<LonLat>,
    },
    LineString {
        coordinates: Vec<LonLat>,
    },
    MultiLineString {
        coordinates: Vec<Vec<LonLat>>,
    },
    /// First ring is the exterior, the rest are holes.
    Polygon {
        coordinates: Vec<Vec<LonLat>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<LonLat>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    /// Any geometry type which is not part of the standard, like `Circle`.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Convert into [`geo_types::Geometry`], so that algorithms from the `geo` crate can be used.
    /// Returns `None` for [`Geometry::Unsupported`]. Unsupported members of a collection are
    /// skipped.
    pub fn to_geo(&self) -> Option<geo_types::Geometry> {
        use geo_types::{
            GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
        };

        Some(match self {
            Geometry::Point { coordinates } => coordinates.position().into(),
            Geometry::MultiPoint { coordinates } => {
                MultiPoint(coordinates.iter().map(|p| p.position()).collect()).into()
            }
            Geometry::LineString { coordinates } => line_string(coordinates).into(),
            Geometry::MultiLineString { coordinates } => {
                MultiLineString(coordinates.iter().map(|l| line_string(l)).collect()).into()
            }
            Geometry::Polygon { coordinates } => polygon(coordinates).into(),
            Geometry::MultiPolygon { coordinates } => {
                MultiPolygon(coordinates.iter().map(|p| polygon(p)).collect()).into()
            }
            Geometry::GeometryCollection { geometries } => {
                geo_types::Geometry::GeometryCollection(GeometryCollection(
                    geometries.iter().filter_map(Geometry::to_geo).collect(),
                ))
            }
            Geometry::Unsupported => return None,
        })
    }

    /// Parse the geometry, treating a malformed one as [`Geometry::Unsupported`].
    fn from_value_or_unsupported(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("Malformed geometry will not be drawn: {err}");
            Geometry::Unsupported
        })
    }
}

fn deserialize_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(Geometry::from_value_or_unsupported))
}

fn deserialize_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            serde_json::from_value(value)
                .inspect_err(|err| log::warn!("Skipping malformed feature #{index}: {err}"))
                .ok()
        })
        .collect())
}

fn line_string(positions: &[LonLat]) -> geo_types::LineString {
    geo_types::LineString(positions.iter().map(|p| p.position().into()).collect())
}

fn polygon(rings: &[Vec<LonLat>]) -> geo_types::Polygon {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings
        .next()
        .unwrap_or_else(|| geo_types::LineString(Vec::new()));
    geo_types::Polygon::new(exterior, rings.collect())
}

/// GeoJSON feature, i.e. a geometry with arbitrary properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    pub id: Option<Value>,

    /// Features without geometry are allowed, but there is nothing to draw for them.
    #[serde(default, deserialize_with = "deserialize_geometry")]
    pub geometry: Option<Geometry>,

    pub properties: Option<Map<String, Value>>,
}

impl From<Geometry> for Feature {
    fn from(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }
}

impl Feature {
    /// Value of the property, if the feature has one with that name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureCollection {
    #[serde(deserialize_with = "deserialize_features")]
    pub features: Vec<Feature>,
}

/// Any GeoJSON document which can be drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(Feature),
    FeatureCollection(FeatureCollection),
    Geometry(Geometry),
}

impl GeoJson {
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        match kind.as_deref() {
            None => Err(Error::MissingType),
            Some("Feature") => Ok(Self::Feature(serde_json::from_value(value)?)),
            Some("FeatureCollection") => {
                Ok(Self::FeatureCollection(serde_json::from_value(value)?))
            }
            // Unknown types are handled by `Geometry::Unsupported`.
            Some(_) => Ok(Self::Geometry(Geometry::from_value_or_unsupported(value))),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Features of the document. Bare geometry is wrapped in a feature without properties.
    pub fn features(&self) -> Cow<'_, [Feature]> {
        match self {
            GeoJson::Feature(feature) => Cow::Borrowed(std::slice::from_ref(feature)),
            GeoJson::FeatureCollection(collection) => Cow::Borrowed(&collection.features),
            GeoJson::Geometry(geometry) => Cow::Owned(vec![Feature::from(geometry.clone())]),
        }
    }
}

impl FromStr for GeoJson {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl From<Feature> for GeoJson {
    fn from(feature: Feature) -> Self {
        Self::Feature(feature)
    }
}

impl From<FeatureCollection> for GeoJson {
    fn from(collection: FeatureCollection) -> Self {
        Self::FeatureCollection(collection)
    }
}

impl From<Geometry> for GeoJson {
    fn from(geometry: Geometry) -> Self {
        Self::Geometry(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsing_feature_collection() {
        let geojson: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-0.0005, 51.4768] },
                    "properties": { "name": "Greenwich Observatory" }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": null
                }
            ]
        }"#
        .parse()
        .unwrap();

        let features = geojson.features();
        assert_eq!(2, features.len());
        assert_eq!(
            Some(Geometry::Point {
                coordinates: LonLat::new(-0.0005, 51.4768)
            }),
            features[0].geometry
        );
        assert_eq!(
            Some(&json!("Greenwich Observatory")),
            features[0].property("name")
        );
        assert_eq!(None, features[1].geometry);
        assert_eq!(None, features[1].property("name"));
    }

    #[test]
    fn parsing_single_feature() {
        let geojson = GeoJson::from_value(json!({
            "type": "Feature",
            "id": 7,
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                    [[2, 2], [4, 2], [4, 4], [2, 2]]
                ]
            }
        }))
        .unwrap();

        let GeoJson::Feature(feature) = geojson else {
            panic!("expected a feature");
        };
        assert_eq!(Some(json!(7)), feature.id);
        assert_eq!(None, feature.properties);

        let Some(Geometry::Polygon { coordinates }) = feature.geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(2, coordinates.len());
        assert_eq!(LonLat::new(10., 10.), coordinates[0][2]);
    }

    #[test]
    fn bare_geometry_becomes_a_feature_without_properties() {
        let geojson = GeoJson::from_slice(
            br#"{ "type": "LineString", "coordinates": [[1, 2, 300], [3, 4]] }"#,
        )
        .unwrap();

        let features = geojson.features();
        assert_eq!(1, features.len());
        assert_eq!(None, features[0].properties);
        assert_eq!(
            Some(Geometry::LineString {
                coordinates: vec![LonLat::new(1., 2.), LonLat::new(3., 4.)]
            }),
            features[0].geometry
        );
    }

    #[test]
    fn unknown_geometry_type_is_not_an_error() {
        let geojson = GeoJson::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Circle", "center": [0, 0], "radius": 10 },
            "properties": {}
        }))
        .unwrap();

        assert_eq!(
            Some(Geometry::Unsupported),
            geojson.features()[0].geometry
        );
    }

    #[test]
    fn geometry_collection_is_recursive() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Point", "coordinates": [1, 2] },
                {
                    "type": "GeometryCollection",
                    "geometries": [{ "type": "MultiPoint", "coordinates": [[3, 4]] }]
                }
            ]
        }))
        .unwrap();

        let Geometry::GeometryCollection { geometries } = geometry else {
            panic!("expected a collection");
        };
        assert!(matches!(
            &geometries[1],
            Geometry::GeometryCollection { geometries } if geometries.len() == 1
        ));
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(
            GeoJson::from_value(json!({ "features": [] })),
            Err(Error::MissingType)
        ));
        assert!(matches!(
            "{ not json".parse::<GeoJson>(),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            GeoJson::from_value(json!({ "type": "FeatureCollection", "features": 5 })),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn malformed_geometry_only_hides_its_own_feature() {
        let geojson = GeoJson::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [17.03, 51.1] },
                    "properties": { "name": "Wroclaw" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [1] },
                    "properties": { "name": "Nowhere" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": [[1, 2], null] }
                },
                "not a feature at all"
            ]
        }))
        .unwrap();

        let features = geojson.features();
        assert_eq!(3, features.len());
        assert_eq!(
            Some(Geometry::Point {
                coordinates: LonLat::new(17.03, 51.1)
            }),
            features[0].geometry
        );
        assert_eq!(Some(Geometry::Unsupported), features[1].geometry);
        assert_eq!(Some(&json!("Nowhere")), features[1].property("name"));
        assert_eq!(Some(Geometry::Unsupported), features[2].geometry);
    }

    #[test]
    fn malformed_bare_geometry_is_unsupported() {
        assert_eq!(
            GeoJson::Geometry(Geometry::Unsupported),
            GeoJson::from_value(json!({ "type": "Point", "coordinates": [1] })).unwrap()
        );
    }

    #[test]
    fn position_needs_two_numbers() {
        assert_eq!(Err(InvalidPosition(1)), LonLat::try_from(vec![1.]));
        assert_eq!(Ok(LonLat::new(1., 2.)), LonLat::try_from(vec![1., 2., 3.]));
    }

    #[test]
    fn converting_to_geo_types() {
        let polygon = Geometry::Polygon {
            coordinates: vec![vec![
                LonLat::new(0., 0.),
                LonLat::new(1., 0.),
                LonLat::new(1., 1.),
                LonLat::new(0., 0.),
            ]],
        };

        let Some(geo_types::Geometry::Polygon(polygon)) = polygon.to_geo() else {
            panic!("expected a polygon");
        };
        assert_eq!(4, polygon.exterior().0.len());
        assert!(polygon.interiors().is_empty());

        assert_eq!(None, Geometry::Unsupported.to_geo());

        let collection = Geometry::GeometryCollection {
            geometries: vec![
                Geometry::Unsupported,
                Geometry::Point {
                    coordinates: LonLat::new(1., 2.),
                },
            ],
        };
        let Some(geo_types::Geometry::GeometryCollection(collection)) = collection.to_geo() else {
            panic!("expected a collection");
        };
        assert_eq!(1, collection.0.len());
    }
}
