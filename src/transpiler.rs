//! SQL rendering for route and pole records.
//!
//! Statements are plain text meant for PostGIS. Geometry travels as GeoJSON
//! through `ST_GeomFromGeoJSON`, and every string literal is escaped by
//! doubling its single quotes.

use serde_json::Value;

use crate::collect::{LineString, PolePoint};
use crate::error::Geo2SqlResult;
use crate::model::{Coordinate, GeometryKind, GeometryOut};

pub const ROUTES_TABLE: &str = "cable_routes";
pub const POLES_TABLE: &str = "ohe_poles";

/// Trait for converting records to SQL.
pub trait ToSql {
    /// Convert this record to a single SQL statement, without a trailing
    /// newline.
    fn to_sql(&self) -> Geo2SqlResult<String>;
}

/// Double every single quote.
pub fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Render `text` as a SQL string literal.
pub fn quote(text: &str) -> String {
    format!("'{}'", escape(text))
}

/// A JSON property used as a text column.
fn text_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

/// A JSON property used as a numeric column. Numeric strings pass through
/// unquoted so the column sees a number either way.
fn numeric_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().parse::<f64>().is_ok_and(f64::is_finite) => {
            s.trim().to_string()
        }
        other => text_literal(other),
    }
}

fn geom_from_geojson(geojson: &str) -> String {
    format!("ST_GeomFromGeoJSON({})", quote(geojson))
}

/// A whole route stored as one `MultiLineString` row.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub name: String,
    pub kind: String,
    pub geometry: Vec<LineString>,
}

impl ToSql for RouteRecord {
    fn to_sql(&self) -> Geo2SqlResult<String> {
        let geojson = GeometryOut::new(GeometryKind::MultiLineString, &self.geometry).to_json()?;
        Ok(format!(
            "INSERT INTO {} (name, type, geom) VALUES ({}, {}, {});",
            ROUTES_TABLE,
            quote(&self.name),
            quote(&self.kind),
            geom_from_geojson(&geojson)
        ))
    }
}

/// One line string of a route stored as its own row.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecord {
    pub name: String,
    pub kind: String,
    pub geometry: LineString,
}

impl SegmentRecord {
    /// `"<base> - Segment <index>"`, index counted from 1.
    pub fn segment_name(base: &str, index: usize) -> String {
        format!("{} - Segment {}", base, index)
    }
}

impl ToSql for SegmentRecord {
    fn to_sql(&self) -> Geo2SqlResult<String> {
        let geojson = GeometryOut::new(GeometryKind::LineString, &self.geometry).to_json()?;
        Ok(format!(
            "INSERT INTO {} (name, type, geom) VALUES ({}, {}, {});",
            ROUTES_TABLE,
            quote(&self.name),
            quote(&self.kind),
            geom_from_geojson(&geojson)
        ))
    }
}

/// A pole row. The route id is looked up by name when the SQL runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PoleRecord {
    pub route_name: String,
    pub pole_no: Value,
    pub km: Value,
    pub height_m: Value,
    pub geometry: Coordinate,
}

impl PoleRecord {
    pub fn new(route_name: &str, point: PolePoint) -> Self {
        Self {
            route_name: route_name.to_string(),
            pole_no: point.properties.pole_no,
            km: point.properties.km,
            height_m: point.properties.height_m,
            geometry: point.coordinate,
        }
    }
}

impl ToSql for PoleRecord {
    fn to_sql(&self) -> Geo2SqlResult<String> {
        let geojson = GeometryOut::new(GeometryKind::Point, &self.geometry).to_json()?;
        Ok(format!(
            "INSERT INTO {} (route_id, pole_no, km, height_m, geom) VALUES (\
             (SELECT id FROM {} WHERE name = {}), {}, {}, {}, {});",
            POLES_TABLE,
            ROUTES_TABLE,
            quote(&self.route_name),
            text_literal(&self.pole_no),
            text_literal(&self.km),
            numeric_literal(&self.height_m),
            geom_from_geojson(&geojson)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn coord(value: Value) -> Coordinate {
        Coordinate::try_from(&value).unwrap()
    }

    #[test]
    fn test_escape_doubles_quotes() {
        assert_eq!(escape("O'Brien's"), "O''Brien''s");
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_route_insert() {
        let record = RouteRecord {
            name: "R1".into(),
            kind: "macro".into(),
            geometry: vec![vec![coord(json!([0, 0])), coord(json!([1, 1]))]],
        };
        assert_eq!(
            record.to_sql().unwrap(),
            r#"INSERT INTO cable_routes (name, type, geom) VALUES ('R1', 'macro', ST_GeomFromGeoJSON('{"type":"MultiLineString","coordinates":[[[0,0],[1,1]]]}'));"#
        );
    }

    #[test]
    fn test_segment_insert() {
        let record = SegmentRecord {
            name: SegmentRecord::segment_name("BNZ-GKP (no.2)", 3),
            kind: "macro".into(),
            geometry: vec![coord(json!([1.5, 2])), coord(json!([3, 4]))],
        };
        assert_eq!(
            record.to_sql().unwrap(),
            r#"INSERT INTO cable_routes (name, type, geom) VALUES ('BNZ-GKP (no.2) - Segment 3', 'macro', ST_GeomFromGeoJSON('{"type":"LineString","coordinates":[[1.5,2],[3,4]]}'));"#
        );
    }

    #[test]
    fn test_pole_insert() {
        let record = PoleRecord {
            route_name: "R1".into(),
            pole_no: json!("P7"),
            km: json!("12.3"),
            height_m: json!(5.5),
            geometry: coord(json!([77.1, 28.6])),
        };
        assert_eq!(
            record.to_sql().unwrap(),
            r#"INSERT INTO ohe_poles (route_id, pole_no, km, height_m, geom) VALUES ((SELECT id FROM cable_routes WHERE name = 'R1'), 'P7', '12.3', 5.5, ST_GeomFromGeoJSON('{"type":"Point","coordinates":[77.1,28.6]}'));"#
        );
    }

    #[test]
    fn test_pole_value_rendering() {
        let record = PoleRecord {
            route_name: "Ram's line".into(),
            pole_no: json!(42),
            km: Value::Null,
            height_m: json!(" 7.25 "),
            geometry: coord(json!([1, 2])),
        };
        let sql = record.to_sql().unwrap();
        assert!(sql.contains("WHERE name = 'Ram''s line'), '42', NULL, 7.25, "));
    }

    #[test]
    fn test_non_numeric_height_is_quoted() {
        assert_eq!(numeric_literal(&json!("tall'ish")), "'tall''ish'");
        assert_eq!(numeric_literal(&json!("NaN")), "'NaN'");
        assert_eq!(numeric_literal(&json!(false)), "FALSE");
        assert_eq!(numeric_literal(&json!(12)), "12");
    }

    #[test]
    fn test_quotes_in_geometry_text_are_escaped() {
        assert_eq!(
            geom_from_geojson(r#"{"a":"b'c"}"#),
            r#"ST_GeomFromGeoJSON('{"a":"b''c"}')"#
        );
    }
}
