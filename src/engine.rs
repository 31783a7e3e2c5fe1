//! File boundary for conversion jobs.
//!
//! Reads the input collection, runs [`transcode`](crate::transcoder::transcode)
//! and writes the statements out. Nothing is written when conversion fails.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::config::{JobConfig, Mode};
use crate::error::{Geo2SqlError, Geo2SqlResult};
use crate::model::FeatureCollection;
use crate::transcoder::transcode;

/// Outcome of a successful job.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mode: Mode,
    pub output: PathBuf,
    pub statements: usize,
}

/// Read and parse a GeoJSON feature collection.
pub fn read_collection(path: &Path) -> Geo2SqlResult<FeatureCollection> {
    info!(path = %path.display(), "reading feature collection");
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Geo2SqlError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => Geo2SqlError::Io(e),
    })?;
    let collection = FeatureCollection::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            Geo2SqlError::Io(source.into())
        } else {
            Geo2SqlError::MalformedJson {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    debug!(features = collection.features.len(), "parsed feature collection");
    Ok(collection)
}

/// The provenance comment written when `header` is on.
pub fn header_line(config: &JobConfig) -> String {
    format!(
        "-- Generated by geo2sql {} ({} mode) from '{}' at {}\n",
        env!("CARGO_PKG_VERSION"),
        config.mode,
        config.input.display(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Convert the job's input and return the full SQL text.
pub fn render(config: &JobConfig) -> Geo2SqlResult<String> {
    let collection = read_collection(&config.input)?;
    let statements = transcode(&collection, config)?;
    let mut sql = if config.header {
        header_line(config)
    } else {
        String::new()
    };
    sql.extend(statements);
    Ok(sql)
}

/// Convert the job's input and write it to the job's output file.
pub fn run(config: &JobConfig) -> Geo2SqlResult<Report> {
    let collection = read_collection(&config.input)?;
    let statements = transcode(&collection, config)?;

    let mut out = BufWriter::new(File::create(&config.output)?);
    if config.header {
        out.write_all(header_line(config).as_bytes())?;
    }
    for statement in &statements {
        out.write_all(statement.as_bytes())?;
    }
    out.flush()?;

    info!(
        output = %config.output.display(),
        statements = statements.len(),
        "wrote SQL file"
    );
    Ok(Report {
        mode: config.mode,
        output: config.output.clone(),
        statements: statements.len(),
    })
}
