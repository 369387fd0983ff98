//! Configuration for markup splice passes.
//!
//! Parses `splice.toml` with serde. When no path is given, the file is
//! searched for in the current directory and its parents; without a file the
//! defaults apply.
//!
//! ```toml
//! [markup]
//! opaque_tags = ["script", "style", "pre", "code", "textarea", "kbd"]
//!
//! [tex]
//! enabled = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "splice.toml";

/// Session configuration for post-processing passes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markup scanning configuration.
    pub markup: MarkupConfig,
    /// Bracket-tex rendering configuration.
    pub tex: TexConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markup scanning configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Tags whose content is never rewritten. `None` keeps the built-in set.
    pub opaque_tags: Option<Vec<String>>,
}

/// Bracket-tex rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TexConfig {
    /// Whether `[tex]...[/tex]` blocks are rendered at all.
    pub enabled: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `splice.toml` in the current directory and parents, falling back to
    /// defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if an opaque tag is empty or contains
    /// characters that cannot appear in a tag name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tag in self.markup.opaque_tags.iter().flatten() {
            if tag.is_empty() {
                return Err(ConfigError::Validation(
                    "markup.opaque_tags cannot contain empty names".to_owned(),
                ));
            }
            if tag
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/'))
            {
                return Err(ConfigError::Validation(format!(
                    "markup.opaque_tags contains invalid tag name {tag:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.tex.enabled);
        assert!(config.markup.opaque_tags.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml("").unwrap();
        assert!(!config.tex.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[markup]
opaque_tags = ["pre", "kbd"]

[tex]
enabled = true
"#;
        let config = Config::from_toml(toml).unwrap();
        assert!(config.tex.enabled);
        assert_eq!(
            config.markup.opaque_tags,
            Some(vec!["pre".to_owned(), "kbd".to_owned()])
        );
    }

    #[test]
    fn test_validate_empty_tag() {
        let err = Config::from_toml("[markup]\nopaque_tags = [\"\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_validate_invalid_tag() {
        let err = Config::from_toml("[markup]\nopaque_tags = [\"<pre>\"]").unwrap_err();
        assert!(err.to_string().contains("invalid tag name"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[tex]\nenabled = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[tex]\nenabled = true").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert!(config.tex.enabled);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }
}
