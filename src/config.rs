//! Codec configuration.
//!
//! A [`CodecConfig`] fixes the characters of the record grammar and the text
//! encoding used for byte-sequence values. It is immutable once handed to a
//! codec.

use crate::encoding::TextEncoding;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_SEPARATOR: char = '|';
pub const DEFAULT_ASSOCIATOR: char = '=';
pub const DEFAULT_LINE_BREAK: &str = "\r\n";

/// Grammar characters and text encoding of a record codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Character between successive `name=value` pairs
    pub separator: char,

    /// Character between a field name and its value
    pub associator: char,

    /// Charset for byte-sequence and binary large-object values
    pub encoding: TextEncoding,

    /// Terminator written after each sub-record of a list block
    pub line_break: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            associator: DEFAULT_ASSOCIATOR,
            encoding: TextEncoding::default(),
            line_break: DEFAULT_LINE_BREAK.to_string(),
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_associator(mut self, associator: char) -> Self {
        self.associator = associator;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_line_break(mut self, line_break: impl Into<String>) -> Self {
        self.line_break = line_break.into();
        self
    }

    /// Load configuration from a YAML file.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Example
    /// ```ignore
    /// use flatbean::CodecConfig;
    ///
    /// // separator: ";"
    /// // associator: ":"
    /// // encoding: iso-8859-1
    /// let config = CodecConfig::load_from_file("config/codec.yaml")?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `FLATBEAN_*` environment variables over defaults.
    ///
    /// Recognised variables: `FLATBEAN_SEPARATOR`, `FLATBEAN_ASSOCIATOR`,
    /// `FLATBEAN_ENCODING`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("FLATBEAN_SEPARATOR") {
            config.separator = single_char("FLATBEAN_SEPARATOR", &value)?;
        }
        if let Some(value) = lookup("FLATBEAN_ASSOCIATOR") {
            config.associator = single_char("FLATBEAN_ASSOCIATOR", &value)?;
        }
        if let Some(value) = lookup("FLATBEAN_ENCODING") {
            config.encoding = value.parse().map_err(ConfigError::Invalid)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the grammar characters can be told apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator == self.associator {
            return Err(ConfigError::Invalid(format!(
                "separator and associator must differ (both are '{}')",
                self.separator
            )));
        }

        for (name, c) in [("separator", self.separator), ("associator", self.associator)] {
            if c == '\r' || c == '\n' {
                return Err(ConfigError::Invalid(format!("{} cannot be a line break", name)));
            }
        }

        if self.line_break.is_empty() || !self.line_break.chars().all(|c| c == '\r' || c == '\n') {
            return Err(ConfigError::Invalid(format!(
                "line_break must be made of '\\r' and '\\n' only, got {:?}",
                self.line_break
            )));
        }

        Ok(())
    }
}

fn single_char(key: &str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::Invalid(format!(
            "{} must be a single character, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.separator, '|');
        assert_eq!(config.associator, '=');
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.line_break, "\r\n");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = CodecConfig::from_yaml_str("separator: ';'\nencoding: iso-8859-1\n").unwrap();
        assert_eq!(config.separator, ';');
        assert_eq!(config.associator, '=');
        assert_eq!(config.encoding, TextEncoding::Iso8859_1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "separator: ','").unwrap();
        writeln!(file, "associator: ':'").unwrap();
        writeln!(file, "line_break: \"\\n\"").unwrap();

        let config = CodecConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.separator, ',');
        assert_eq!(config.associator, ':');
        assert_eq!(config.line_break, "\n");
    }

    #[test]
    fn test_missing_file() {
        let result = CodecConfig::load_from_file("/nonexistent/flatbean.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(CodecConfig::from_yaml_str("separator: '='\n").is_err());
        assert!(CodecConfig::default().with_associator('\n').validate().is_err());
        assert!(CodecConfig::default().with_line_break("").validate().is_err());
        assert!(CodecConfig::default().with_line_break("--").validate().is_err());
        assert!(matches!(
            CodecConfig::from_yaml_str("encoding: ebcdic\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("FLATBEAN_SEPARATOR", ";"),
            ("FLATBEAN_ENCODING", "us-ascii"),
        ]
        .into_iter()
        .collect();

        let config = CodecConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.separator, ';');
        assert_eq!(config.associator, '=');
        assert_eq!(config.encoding, TextEncoding::UsAscii);

        let result = CodecConfig::from_lookup(|key| {
            (key == "FLATBEAN_ASSOCIATOR").then(|| "::".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
