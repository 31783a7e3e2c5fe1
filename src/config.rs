//! Job configuration.
//!
//! Settings come from three layers: command-line flags, an optional
//! `geo2sql.toml`, and interactive prompts. Each layer fills a
//! [`JobSettings`] of optional fields; [`JobSettings::merge`] stacks them and
//! [`JobSettings::resolve`] turns the result into a complete [`JobConfig`].
//!
//! ```toml
//! mode = "route"
//! input = "lucknow_cables.geojson"
//! route_name = "BNZ-GKP (no.2)"
//! route_type = "macro"
//! output = "insert_fixed_route.sql"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::collect::Dimensions;
use crate::error::{Geo2SqlError, Geo2SqlResult};

pub const CONFIG_FILE: &str = "geo2sql.toml";
pub const DEFAULT_ROUTE_TYPE: &str = "macro";

/// What kind of SQL a job emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// All line strings merged into one `cable_routes` row.
    Route,
    /// One `cable_routes` row per line string.
    Segments,
    /// One `ohe_poles` row per point.
    Poles,
}

impl Mode {
    pub fn default_output(&self) -> &'static str {
        match self {
            Mode::Route => "output.sql",
            Mode::Segments => "insert_routes.sql",
            Mode::Poles => "insert_poles.sql",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Route => "route",
            Mode::Segments => "segments",
            Mode::Poles => "poles",
        };
        f.write_str(s)
    }
}

/// A fully resolved job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Route name, or the base name of segments, or the route poles link to.
    pub route_name: String,
    pub route_type: String,
    pub keep_elevation: bool,
    /// Prefix the output with a provenance comment.
    pub header: bool,
}

impl JobConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from_keep_elevation(self.keep_elevation)
    }
}

/// One layer of partially known settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSettings {
    pub mode: Option<Mode>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub route_name: Option<String>,
    pub route_type: Option<String>,
    pub keep_elevation: Option<bool>,
    pub header: Option<bool>,
}

impl JobSettings {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str, origin: &Path) -> Geo2SqlResult<Self> {
        toml::from_str(content).map_err(|source| Geo2SqlError::ConfigFile {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Geo2SqlResult<Self> {
        if !path.exists() {
            return Err(Geo2SqlError::Config(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml(&content, path)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    /// Look for `geo2sql.toml` in the working directory, then in the user's
    /// config directory.
    pub fn discover() -> Geo2SqlResult<Option<(PathBuf, Self)>> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE)),
            dirs::config_dir().map(|dir| dir.join("geo2sql").join(CONFIG_FILE)),
        ];
        Self::load_first(candidates.into_iter().flatten())
    }

    /// Load the first candidate that is an existing file.
    fn load_first(
        candidates: impl IntoIterator<Item = PathBuf>,
    ) -> Geo2SqlResult<Option<(PathBuf, Self)>> {
        for path in candidates {
            if path.is_file() {
                let settings = Self::load(&path)?;
                return Ok(Some((path, settings)));
            }
        }
        Ok(None)
    }

    /// Fields set in `self` win over `lower`.
    pub fn merge(self, lower: JobSettings) -> JobSettings {
        JobSettings {
            mode: self.mode.or(lower.mode),
            input: self.input.or(lower.input),
            output: self.output.or(lower.output),
            route_name: self.route_name.or(lower.route_name),
            route_type: self.route_type.or(lower.route_type),
            keep_elevation: self.keep_elevation.or(lower.keep_elevation),
            header: self.header.or(lower.header),
        }
    }

    /// Fill in defaults and check the required fields.
    pub fn resolve(self) -> Geo2SqlResult<JobConfig> {
        let mode = self
            .mode
            .ok_or_else(|| Geo2SqlError::Config("no mode given (route, segments or poles)".into()))?;
        let input = self
            .input
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Geo2SqlError::Config("no input file given".into()))?;
        let route_name = self
            .route_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Geo2SqlError::Config("no route name given".into()))?;
        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(mode.default_output()));

        if output == input {
            return Err(Geo2SqlError::Config(format!(
                "output '{}' would overwrite the input file",
                output.display()
            )));
        }

        Ok(JobConfig {
            mode,
            input,
            output,
            route_name,
            route_type: self
                .route_type
                .unwrap_or_else(|| DEFAULT_ROUTE_TYPE.to_string()),
            keep_elevation: self.keep_elevation.unwrap_or(false),
            header: self.header.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn origin() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    #[test]
    fn test_parse_config_file() {
        let settings = JobSettings::from_toml(
            r#"
            mode = "segments"
            input = "lucknow_cables.geojson"
            route_name = "BNZ-GKP (no.2)"
            keep_elevation = true
            "#,
            &origin(),
        )
        .unwrap();
        assert_eq!(settings.mode, Some(Mode::Segments));
        assert_eq!(settings.keep_elevation, Some(true));
        assert_eq!(settings.output, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = JobSettings::from_toml("route = \"x\"", &origin()).unwrap_err();
        assert!(matches!(err, Geo2SqlError::ConfigFile { .. }));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = JobSettings {
            mode: Some(Mode::Poles),
            input: Some("poles.geojson".into()),
            route_name: Some("R1".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(config.output, PathBuf::from("insert_poles.sql"));
        assert_eq!(config.route_type, "macro");
        assert!(!config.keep_elevation);
        assert_eq!(config.dimensions(), Dimensions::Planar);
    }

    #[test]
    fn test_merge_prefers_upper_layer() {
        let cli = JobSettings {
            route_name: Some("from-cli".into()),
            ..Default::default()
        };
        let file = JobSettings {
            mode: Some(Mode::Route),
            input: Some("a.geojson".into()),
            route_name: Some("from-file".into()),
            ..Default::default()
        };
        let config = cli.merge(file).resolve().unwrap();
        assert_eq!(config.route_name, "from-cli");
        assert_eq!(config.mode, Mode::Route);
        assert_eq!(config.output, PathBuf::from("output.sql"));
    }

    #[test]
    fn test_resolve_requires_fields() {
        let missing_name = JobSettings {
            mode: Some(Mode::Route),
            input: Some("a.geojson".into()),
            route_name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(missing_name.resolve(), Err(Geo2SqlError::Config(_))));
        assert!(JobSettings::default().resolve().is_err());
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let settings = JobSettings {
            mode: Some(Mode::Route),
            input: Some("same.sql".into()),
            output: Some("same.sql".into()),
            route_name: Some("R".into()),
            ..Default::default()
        };
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "mode = \"poles\"\ninput = \"poles.geojson\"\nroute_name = \"R1\"\nheader = true\n",
        )
        .unwrap();

        let settings = JobSettings::load(&path).unwrap();
        assert_eq!(settings.mode, Some(Mode::Poles));
        assert_eq!(settings.header, Some(true));

        let config = settings.resolve().unwrap();
        assert_eq!(config.input, PathBuf::from("poles.geojson"));
        assert_eq!(config.route_name, "R1");
    }

    #[test]
    fn test_load_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match JobSettings::load(&path) {
            Err(Geo2SqlError::Config(message)) => {
                assert!(message.contains("not found"));
                assert!(message.contains("absent.toml"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_bad_toml_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "mode = \"tunnel\"\n").unwrap();
        match JobSettings::load(&path) {
            Err(Geo2SqlError::ConfigFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_discovery_takes_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(CONFIG_FILE);
        let user = dir.path().join("user").join(CONFIG_FILE);
        std::fs::create_dir_all(user.parent().unwrap()).unwrap();
        std::fs::write(&user, "mode = \"route\"\n").unwrap();

        let found = JobSettings::load_first([local.clone(), user.clone()]).unwrap();
        assert_eq!(found.map(|(path, s)| (path, s.mode)), Some((user.clone(), Some(Mode::Route))));

        std::fs::write(&local, "mode = \"segments\"\n").unwrap();
        let found = JobSettings::load_first([local.clone(), user]).unwrap();
        assert_eq!(found.map(|(path, s)| (path, s.mode)), Some((local, Some(Mode::Segments))));

        assert!(JobSettings::load_first([dir.path().join("none.toml")]).unwrap().is_none());
    }
}
