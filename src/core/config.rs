//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Global user config (`<config dir>/sqlwire/config.yaml`), optional keys only
//! 3. Project config (`sqlwire.yaml`, `--config` or `SQLWIRE_CONFIG`)
//! 4. Environment variables (`SQLWIRE_DB_PATH`, `SQLWIRE_RENDERER`)

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::YamlSyntaxError;

pub const DEFAULT_CONFIG_FILE: &str = "sqlwire.yaml";
pub const CONFIG_ENV: &str = "SQLWIRE_CONFIG";
pub const DB_PATH_ENV: &str = "SQLWIRE_DB_PATH";
pub const RENDERER_ENV: &str = "SQLWIRE_RENDERER";

pub const DEFAULT_RENDERER: &str = "wireviz";
pub const DEFAULT_MISC_BOM_FILE: &str = "MiscBOM.csv";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    #[diagnostic(
        code(sqlwire::config::not_found),
        help("run `sqlwire init` to write a starter configuration")
    )]
    NotFound { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("{path}: missing required key '{key}'")]
    #[diagnostic(code(sqlwire::config::missing_key))]
    MissingKey { path: PathBuf, key: &'static str },

    #[error("failed to read {path}")]
    #[diagnostic(code(sqlwire::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which cable designators make up the harness: `{prefix}{n:0width}` for
/// `n` in `from..=to`, minus `exclude`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CableRange {
    pub prefix: String,
    pub width: usize,
    pub from: u32,
    pub to: u32,
    pub exclude: Vec<u32>,
}

impl Default for CableRange {
    fn default() -> Self {
        Self {
            prefix: "W".to_string(),
            width: 3,
            from: 0,
            to: 50,
            exclude: vec![10, 21, 32, 43],
        }
    }
}

impl CableRange {
    pub fn filters(&self) -> Vec<String> {
        (self.from..=self.to)
            .filter(|n| !self.exclude.contains(n))
            .map(|n| format!("{}{:0width$}", self.prefix, n, width = self.width))
            .collect()
    }
}

/// Which attachments a `build` produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Outputs {
    pub bom: bool,
    pub labels: bool,
    pub drawings: bool,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            bom: true,
            labels: true,
            drawings: true,
        }
    }
}

/// The file as written; every key optional so that missing ones can be
/// reported by name
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    base_repo_path: Option<PathBuf>,
    db_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    drawings_path: Option<PathBuf>,
    attachments_path: Option<PathBuf>,
    resources_path: Option<PathBuf>,
    renderer: Option<String>,
    misc_bom_file: Option<PathBuf>,
    cables: Option<CableRange>,
    outputs: Option<Outputs>,
}

impl RawConfig {
    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: RawConfig) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            base_repo_path,
            db_path,
            output_path,
            drawings_path,
            attachments_path,
            resources_path,
            renderer,
            misc_bom_file,
            cables,
            outputs
        );
    }
}

/// Resolved configuration, all paths absolute or relative to the working
/// directory
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_path: PathBuf,
    pub db_path: PathBuf,
    pub output_path: PathBuf,
    pub drawings_path: PathBuf,
    pub attachments_path: PathBuf,
    pub resources_path: PathBuf,
    pub renderer: String,
    pub misc_bom_path: PathBuf,
    pub cables: CableRange,
    pub outputs: Outputs,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut raw = RawConfig::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.is_file() {
                raw.merge(read_raw(&global_path)?);
            }
        }

        if !path.is_file() {
            return Err(ConfigError::NotFound { path });
        }
        raw.merge(read_raw(&path)?);

        if let Ok(db) = std::env::var(DB_PATH_ENV) {
            raw.db_path = Some(PathBuf::from(db));
        }
        if let Ok(renderer) = std::env::var(RENDERER_ENV) {
            raw.renderer = Some(renderer);
        }

        Self::resolve(raw, &path)
    }

    /// Parse a single YAML document with no layering or environment
    pub fn from_yaml_str(contents: &str, filename: &str) -> Result<Self, ConfigError> {
        let raw = parse_raw(contents, filename)?;
        Self::resolve(raw, Path::new(filename))
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sqlwire")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn resolve(raw: RawConfig, source: &Path) -> Result<Self, ConfigError> {
        let required = |value: Option<PathBuf>, key: &'static str| {
            value.ok_or_else(|| ConfigError::MissingKey {
                path: source.to_path_buf(),
                key,
            })
        };

        let base_path = required(raw.base_repo_path, "base_repo_path")?;
        let at_base = |p: PathBuf| if p.is_absolute() { p } else { base_path.join(p) };

        let db_path = at_base(required(raw.db_path, "db_path")?);
        let output_path = at_base(required(raw.output_path, "output_path")?);
        let drawings_path = at_base(required(raw.drawings_path, "drawings_path")?);
        let attachments_path = at_base(required(raw.attachments_path, "attachments_path")?);

        let resources_path = match raw.resources_path {
            Some(p) => at_base(p),
            None => output_path
                .parent()
                .map(|parent| parent.join("resources"))
                .unwrap_or_else(|| PathBuf::from("resources")),
        };

        let misc_bom_path = match raw.misc_bom_file {
            Some(p) if p.is_absolute() => p,
            Some(p) => attachments_path.join(p),
            None => attachments_path.join(DEFAULT_MISC_BOM_FILE),
        };

        Ok(Self {
            base_path,
            db_path,
            output_path,
            drawings_path,
            attachments_path,
            resources_path,
            renderer: raw.renderer.unwrap_or_else(|| DEFAULT_RENDERER.to_string()),
            misc_bom_path,
            cables: raw.cables.unwrap_or_default(),
            outputs: raw.outputs.unwrap_or_default(),
        })
    }

    /// Cable designators covered by a full build
    pub fn cable_filters(&self) -> Vec<String> {
        self.cables.filters()
    }

    /// Commented starter configuration written by `sqlwire init`
    pub fn starter() -> &'static str {
        STARTER
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_raw(&contents, &path.display().to_string())
}

fn parse_raw(contents: &str, filename: &str) -> Result<RawConfig, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    serde_yml::from_str(contents)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, contents, filename).into())
}

const STARTER: &str = r#"# sqlwire configuration
#
# Relative paths are resolved against base_repo_path.

base_repo_path: .
db_path: harness.db
output_path: output
drawings_path: output/drawings
attachments_path: output/attachments

# Connector images (<mate_mpn>.png). Defaults to <output_path>/../resources
# resources_path: resources

# Diagram renderer executable
# renderer: wireviz

# Extra BOM items (description, mpn, manufacturer, quantity, unit).
# Relative to attachments_path.
# misc_bom_file: MiscBOM.csv

# Cable designators processed by `sqlwire build`: W000..W050
cables:
  prefix: W
  width: 3
  from: 0
  to: 50
  exclude: [10, 21, 32, 43]

outputs:
  bom: true
  labels: true
  drawings: true
"#;
