//! Feature collection to SQL statements.
//!
//! [`transcode`] is the whole conversion as a pure function. The `build_*`
//! helpers are the three output shapes it dispatches to; each returns
//! newline-terminated statements, or [`Geo2SqlError::NoMatchingFeatures`]
//! when given nothing to convert.

use tracing::info;

use crate::collect::{self, LineString, NumberedLineString, PolePoint};
use crate::config::{JobConfig, Mode};
use crate::error::{Geo2SqlError, Geo2SqlResult};
use crate::model::{FeatureCollection, GeometryKind};
use crate::transpiler::{PoleRecord, RouteRecord, SegmentRecord, ToSql};

fn no_match(kind: GeometryKind) -> Geo2SqlError {
    Geo2SqlError::NoMatchingFeatures {
        expected: kind.as_str(),
    }
}

fn statement(record: &impl ToSql) -> Geo2SqlResult<String> {
    let mut sql = record.to_sql()?;
    sql.push('\n');
    Ok(sql)
}

/// One `cable_routes` row holding every line string as a `MultiLineString`.
pub fn build_multi_line_string_insert(
    name: &str,
    kind: &str,
    line_strings: Vec<LineString>,
) -> Geo2SqlResult<String> {
    if line_strings.is_empty() {
        return Err(no_match(GeometryKind::LineString));
    }
    statement(&RouteRecord {
        name: name.to_string(),
        kind: kind.to_string(),
        geometry: line_strings,
    })
}

/// One `cable_routes` row per line string, named `"<base> - Segment <i>"`
/// where `i` is the 1-based position of the feature in the collection.
pub fn build_per_segment_inserts(
    base_name: &str,
    kind: &str,
    line_strings: Vec<NumberedLineString>,
) -> Geo2SqlResult<Vec<String>> {
    if line_strings.is_empty() {
        return Err(no_match(GeometryKind::LineString));
    }
    line_strings
        .into_iter()
        .map(|line| {
            statement(&SegmentRecord {
                name: SegmentRecord::segment_name(base_name, line.feature_index + 1),
                kind: kind.to_string(),
                geometry: line.positions,
            })
        })
        .collect()
}

/// One `ohe_poles` row per point, linked to `route_name` by subquery.
pub fn build_pole_inserts(route_name: &str, poles: Vec<PolePoint>) -> Geo2SqlResult<Vec<String>> {
    if poles.is_empty() {
        return Err(no_match(GeometryKind::Point));
    }
    poles
        .into_iter()
        .map(|point| statement(&PoleRecord::new(route_name, point)))
        .collect()
}

/// Convert a parsed collection according to `config`.
pub fn transcode(collection: &FeatureCollection, config: &JobConfig) -> Geo2SqlResult<Vec<String>> {
    let dims = config.dimensions();
    let statements = match config.mode {
        Mode::Route => {
            let lines = collect::collect_line_strings(&collection.features, dims)?;
            vec![build_multi_line_string_insert(
                &config.route_name,
                &config.route_type,
                lines,
            )?]
        }
        Mode::Segments => {
            let lines = collect::collect_numbered_line_strings(&collection.features, dims)?;
            build_per_segment_inserts(&config.route_name, &config.route_type, lines)?
        }
        Mode::Poles => {
            let points = collect::collect_points(&collection.features, dims)?;
            build_pole_inserts(&config.route_name, points)?
        }
    };
    info!(
        mode = %config.mode,
        statements = statements.len(),
        "transcoded feature collection"
    );
    Ok(statements)
}
