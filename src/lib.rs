//! # geo2sql
//!
//! Turns GeoJSON cable routes and pole surveys into PostGIS `INSERT`
//! statements for the `cable_routes` and `ohe_poles` tables.
//!
//! ## Quick Example
//!
//! ```
//! use geo2sql::prelude::*;
//!
//! let collection: FeatureCollection = r#"{"type":"FeatureCollection","features":[
//!     {"geometry":{"type":"LineString","coordinates":[[0,0,10],[1,1,20]]},"properties":{}}
//! ]}"#.parse().unwrap();
//!
//! let config = JobSettings {
//!     mode: Some(Mode::Route),
//!     input: Some("route.geojson".into()),
//!     route_name: Some("R1".into()),
//!     ..Default::default()
//! }
//! .resolve()
//! .unwrap();
//!
//! let sql = geo2sql::transcode(&collection, &config).unwrap();
//! assert_eq!(
//!     sql[0],
//!     "INSERT INTO cable_routes (name, type, geom) VALUES ('R1', 'macro', \
//!      ST_GeomFromGeoJSON('{\"type\":\"MultiLineString\",\"coordinates\":[[[0,0],[1,1]]]}'));\n"
//! );
//! ```
//!
//! ## Modes
//!
//! | Mode       | Reads        | Emits                                  |
//! |------------|--------------|----------------------------------------|
//! | `route`    | LineString   | one `cable_routes` row, MultiLineString |
//! | `segments` | LineString   | one `cable_routes` row per line string |
//! | `poles`    | Point        | one `ohe_poles` row per point          |
//!
//! Coordinates are cut to longitude/latitude in every mode unless the job
//! sets `keep_elevation`.

pub mod collect;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod prompt;
pub mod transcoder;
pub mod transpiler;

pub mod prelude {
    pub use crate::collect::{Dimensions, LineString, PolePoint, PoleProperties};
    pub use crate::config::{JobConfig, JobSettings, Mode};
    pub use crate::engine::{Report, read_collection, render, run};
    pub use crate::error::*;
    pub use crate::model::{Coordinate, Feature, FeatureCollection, Geometry, GeometryKind};
    pub use crate::transcoder::transcode;
    pub use crate::transpiler::ToSql;
}

pub use transcoder::transcode;
