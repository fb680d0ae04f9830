//! Formatter settings, loaded from YAML.
//!
//! ```yaml
//! dialect: try-both
//! max_nesting: 128
//! verify: true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::diagnostics::{ErrorContext, SparqlError};
use crate::syntax::{DialectChoice, DEFAULT_MAX_NESTING};

/// File picked up from the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "sparqlfmt.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How the dialect of unlabelled input is chosen.
    pub dialect: DialectChoice,
    /// Deepest bracket nesting accepted before parsing.
    pub max_nesting: usize,
    /// Re-parse formatted output and fail if the tree changed.
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectChoice::default(),
            max_nesting: DEFAULT_MAX_NESTING,
            verify: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self, SparqlError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(text).map_err(|e| SparqlError::Config {
            message: format!("invalid configuration: {e}"),
            ctx: ErrorContext::none(),
            source: Some(Box::new(e)),
        })?;
        config.validate()
    }

    pub fn load(path: &Path) -> Result<Self, SparqlError> {
        let text = fs::read_to_string(path)
            .map_err(|e| SparqlError::io(format!("cannot read {}", path.display()), e))?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            SparqlError::Config { message, ctx, source } => SparqlError::Config {
                message: format!("{}: {message}", path.display()),
                ctx,
                source,
            },
            other => other,
        })
    }

    /// Loads `path` if given, else `sparqlfmt.yaml` in `dir` if it exists,
    /// else the defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, SparqlError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate: PathBuf = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("using configuration {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(self) -> Result<Self, SparqlError> {
        if self.max_nesting == 0 {
            return Err(SparqlError::config("max_nesting must be at least 1"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.dialect, DialectChoice::Guess);
        assert_eq!(config.max_nesting, DEFAULT_MAX_NESTING);
        assert!(!config.verify);
        assert_eq!(Config::from_yaml_str("").unwrap(), config);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str("dialect: try-both\nverify: true\n").unwrap();
        assert_eq!(config.dialect, DialectChoice::TryBoth);
        assert!(config.verify);
        assert_eq!(config.max_nesting, DEFAULT_MAX_NESTING);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_nesting() {
        let err = Config::from_yaml_str("indent: 4\n").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        let err = Config::from_yaml_str("max_nesting: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_nesting"));
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("sparqlfmt-config-test-empty");
        fs::create_dir_all(&dir).unwrap();
        let _ = fs::remove_file(dir.join(CONFIG_FILE_NAME));
        assert_eq!(Config::discover(None, &dir).unwrap(), Config::default());
    }

    #[test]
    fn discover_reads_the_working_directory_file() {
        let dir = std::env::temp_dir().join("sparqlfmt-config-test-found");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "dialect: update\n").unwrap();
        let config = Config::discover(None, &dir).unwrap();
        assert_eq!(config.dialect, DialectChoice::Update);
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = Config::discover(Some(Path::new("/no/such/sparqlfmt.yaml")), Path::new("."))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }
}
