//! Feature filtering and property extraction.
//!
//! Everything here is pure: features in, owned records out.

use serde_json::Value;
use tracing::debug;

use crate::error::{Geo2SqlError, Geo2SqlResult};
use crate::model::{Coordinate, Feature, GeometryKind, Properties};

/// An ordered run of positions.
pub type LineString = Vec<Coordinate>;

/// How many coordinate components reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimensions {
    /// Longitude and latitude only. Elevation is dropped.
    #[default]
    Planar,
    /// Positions are copied as the source wrote them.
    Raw,
}

impl Dimensions {
    pub fn from_keep_elevation(keep: bool) -> Self {
        if keep { Dimensions::Raw } else { Dimensions::Planar }
    }

    pub fn apply(&self, coordinate: Coordinate) -> Coordinate {
        match self {
            Dimensions::Planar => coordinate.truncate_2d(),
            Dimensions::Raw => coordinate,
        }
    }
}

/// When a candidate property counts as set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The key exists, whatever its value.
    Present,
    /// The key exists and its value is truthy: not `null`, `false`, zero,
    /// an empty string, or an empty array or object.
    Truthy,
}

/// Value used when no candidate key is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackDefault {
    Text(&'static str),
    Number(f64),
}

impl FallbackDefault {
    pub fn to_value(self) -> Value {
        match self {
            FallbackDefault::Text(s) => Value::from(s),
            FallbackDefault::Number(n) => Value::from(n),
        }
    }
}

/// An ordered list of property keys tried in turn, then a typed default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fallback {
    pub keys: &'static [&'static str],
    pub presence: Presence,
    pub default: FallbackDefault,
}

impl Fallback {
    pub fn resolve(&self, properties: Option<&Properties>) -> Value {
        properties
            .and_then(|props| {
                self.keys
                    .iter()
                    .filter_map(|key| props.get(*key))
                    .find(|value| self.accepts(value))
            })
            .cloned()
            .unwrap_or_else(|| self.default.to_value())
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.presence {
            Presence::Present => true,
            Presence::Truthy => match value {
                Value::Null | Value::Bool(false) => false,
                Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
                Value::String(s) => !s.is_empty(),
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                Value::Bool(true) => true,
            },
        }
    }
}

pub const POLE_NO: Fallback = Fallback {
    keys: &["pole_no", "Name"],
    presence: Presence::Truthy,
    default: FallbackDefault::Text("N/A"),
};

pub const KM: Fallback = Fallback {
    keys: &["km"],
    presence: Presence::Present,
    default: FallbackDefault::Text("N/A"),
};

pub const HEIGHT_M: Fallback = Fallback {
    keys: &["height_m"],
    presence: Presence::Present,
    default: FallbackDefault::Number(5.5),
};

/// The pole attributes pulled out of a point's properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PoleProperties {
    pub pole_no: Value,
    pub km: Value,
    pub height_m: Value,
}

impl PoleProperties {
    pub fn extract(properties: Option<&Properties>) -> Self {
        Self {
            pole_no: POLE_NO.resolve(properties),
            km: KM.resolve(properties),
            height_m: HEIGHT_M.resolve(properties),
        }
    }
}

/// A point feature ready to become a pole row.
#[derive(Debug, Clone, PartialEq)]
pub struct PolePoint {
    pub coordinate: Coordinate,
    pub properties: PoleProperties,
}

/// A line string with the position of its feature in the source
/// collection, counting every feature.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedLineString {
    pub feature_index: usize,
    pub positions: LineString,
}

/// Every `LineString` feature with its feature index, in feature order.
pub fn collect_numbered_line_strings(
    features: &[Feature],
    dims: Dimensions,
) -> Geo2SqlResult<Vec<NumberedLineString>> {
    let mut lines = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.geometry_of(GeometryKind::LineString) else {
            continue;
        };
        let positions = geometry
            .line_string()
            .map_err(|e| Geo2SqlError::geometry(index, e))?;
        lines.push(NumberedLineString {
            feature_index: index,
            positions: positions.into_iter().map(|c| dims.apply(c)).collect(),
        });
    }
    debug!(
        features = features.len(),
        line_strings = lines.len(),
        "collected line strings"
    );
    Ok(lines)
}

/// Every `LineString` feature's positions, in feature order.
pub fn collect_line_strings(
    features: &[Feature],
    dims: Dimensions,
) -> Geo2SqlResult<Vec<LineString>> {
    Ok(collect_numbered_line_strings(features, dims)?
        .into_iter()
        .map(|line| line.positions)
        .collect())
}

/// [`collect_line_strings`] with elevation dropped.
pub fn collect_line_strings_2d(features: &[Feature]) -> Geo2SqlResult<Vec<LineString>> {
    collect_line_strings(features, Dimensions::Planar)
}

/// Every `Point` feature with its pole attributes, in feature order.
pub fn collect_points(features: &[Feature], dims: Dimensions) -> Geo2SqlResult<Vec<PolePoint>> {
    let mut points = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.geometry_of(GeometryKind::Point) else {
            continue;
        };
        let coordinate = geometry
            .point()
            .map_err(|e| Geo2SqlError::geometry(index, e))?;
        points.push(PolePoint {
            coordinate: dims.apply(coordinate),
            properties: PoleProperties::extract(feature.properties.as_ref()),
        });
    }
    debug!(
        features = features.len(),
        points = points.len(),
        "collected points"
    );
    Ok(points)
}

/// [`collect_points`] with elevation dropped.
pub fn collect_points_2d(features: &[Feature]) -> Geo2SqlResult<Vec<PolePoint>> {
    collect_points(features, Dimensions::Planar)
}
