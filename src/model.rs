//! GeoJSON input model.
//!
//! Only the parts of RFC 7946 the converter reads are modelled. Coordinates
//! keep their JSON number literals, so `0` is written back as `0` and not
//! as `0.0`.

use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Property bag of a feature.
pub type Properties = Map<String, Value>;

/// A parsed `FeatureCollection`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parse a collection from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

impl FromStr for FeatureCollection {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

/// A single feature. Both members may be absent or `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    /// The geometry, if it carries the given tag.
    pub fn geometry_of(&self, kind: GeometryKind) -> Option<&Geometry> {
        self.geometry.as_ref().filter(|g| g.kind() == kind)
    }
}

/// Geometry tags the converter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    MultiLineString,
    Other,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw geometry object. The payload is decoded lazily, only for the
/// geometries a job actually converts.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self.tag.as_str() {
            "Point" => GeometryKind::Point,
            "LineString" => GeometryKind::LineString,
            "MultiLineString" => GeometryKind::MultiLineString,
            _ => GeometryKind::Other,
        }
    }

    /// Decode a `Point` payload.
    pub fn point(&self) -> Result<Coordinate, String> {
        Coordinate::try_from(&self.coordinates)
    }

    /// Decode a `LineString` payload.
    pub fn line_string(&self) -> Result<Vec<Coordinate>, String> {
        match &self.coordinates {
            Value::Array(positions) => positions.iter().map(Coordinate::try_from).collect(),
            other => Err(format!("expected an array of positions, got {}", other)),
        }
    }
}

/// A position of two or more numbers: longitude, latitude, then optional
/// elevation and anything else the source carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Coordinate(Vec<Number>);

impl Coordinate {
    /// Keep longitude and latitude only. A no-op on 2D positions.
    pub fn truncate_2d(&self) -> Coordinate {
        Coordinate(self.0[..2].to_vec())
    }

    pub fn components(&self) -> &[Number] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<&Value> for Coordinate {
    type Error = String;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Array(items) = value else {
            return Err(format!("expected a position array, got {}", value));
        };
        if items.len() < 2 {
            return Err(format!(
                "a position needs at least 2 components, got {}",
                items.len()
            ));
        }
        items
            .iter()
            .map(|item| match item {
                Value::Number(n) => Ok(n.clone()),
                other => Err(format!("non-numeric component {}", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Coordinate)
    }
}

/// Geometry written back out as compact GeoJSON, `type` first.
#[derive(Debug, Serialize)]
pub struct GeometryOut<'a, C: Serialize> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: &'a C,
}

impl<'a, C: Serialize> GeometryOut<'a, C> {
    pub fn new(kind: GeometryKind, coordinates: &'a C) -> Self {
        Self {
            kind: kind.as_str(),
            coordinates,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
