//! Configuration management for vschema.
//!
//! Parses `vschema.toml`, `vschema.yaml`, `vschema.yml` or `vschema.json`
//! with serde and provides auto-discovery of config files in parent
//! directories.
//!
//! The `directives` section is normalized into a [`MappingTable`] while the
//! file is loaded, so a malformed directive mapping fails here and never
//! during compilation.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```yaml
//! schema: yup
//! importFrom: ./types
//! directives:
//!   required:
//!     msg: required
//!   constraint:
//!     minLength: min
//!     startsWith: ["matches", "/^$1/"]
//!     format:
//!       uri: url
//!       email: email
//! ```

mod format;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use vschema_rules::{ConfigError, MappingTable};

pub use format::Format;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override target validation library.
    pub schema: Option<ValidationSchema>,
    /// Override the module generated code imports types from.
    pub import_from: Option<String>,
}

/// Configuration filenames to search for, in priority order.
const CONFIG_FILENAMES: [&str; 4] = [
    "vschema.toml",
    "vschema.yaml",
    "vschema.yml",
    "vschema.json",
];

/// Target validation library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSchema {
    /// `yup` schemas.
    #[default]
    Yup,
    /// `zod` schemas.
    Zod,
}

impl FromStr for ValidationSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yup" => Ok(Self::Yup),
            "zod" => Ok(Self::Zod),
            other => Err(format!("unknown schema `{other}`, expected `yup` or `zod`")),
        }
    }
}

impl fmt::Display for ValidationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yup => "yup",
            Self::Zod => "zod",
        })
    }
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Target validation library.
    pub schema: ValidationSchema,
    /// Module path generated code imports types from (omitted when `None`).
    pub import_from: Option<String>,
    /// Generate enums as TypeScript `type` aliases.
    pub enums_as_types: bool,
    /// Raw directive configuration as parsed from the file.
    #[serde(rename = "directives")]
    directives_raw: serde_json::Value,

    /// Normalized directive mapping (set after loading).
    #[serde(skip)]
    pub directives: MappingTable,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// File extension is not a supported format.
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Malformed directive mapping.
    #[error("Directive configuration error: {0}")]
    Directives(#[from] ConfigError),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), LoadError> {
    if value.trim().is_empty() {
        return Err(LoadError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for a config file in current directory and parents,
    /// falling back to defaults (no directive mapping) if none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the directive mapping is malformed.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, LoadError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(LoadError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered configuration file");
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from a string in the given format.
    ///
    /// # Errors
    ///
    /// Returns error if parsing fails, the directive mapping is malformed, or
    /// validation fails.
    pub fn parse(content: &str, format: Format) -> Result<Self, LoadError> {
        let mut config: Self = format.parse(content)?;
        config.resolve_directives()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(schema) = settings.schema {
            self.schema = schema;
        }
        if let Some(import_from) = &settings.import_from {
            self.import_from = Some(import_from.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            if let Some(found) = Self::find_in_dir(&current) {
                return Some(found);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// First config file present in `dir`, by filename priority.
    fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, format)?;
        config.config_path = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            format = %format,
            directives = config.directives.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Normalize the raw `directives` section into a [`MappingTable`].
    fn resolve_directives(&mut self) -> Result<(), LoadError> {
        self.directives = MappingTable::from_value(&self.directives_raw)?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), LoadError> {
        if let Some(ref import_from) = self.import_from {
            require_non_empty(import_from, "importFrom")?;
        }
        Ok(())
    }
}
