//! Index configuration
//!
//! ```json
//! {"id": "color", "indexed_attrs": "color, colour", "default_operator": "or"}
//! ```
//!
//! - `id` is required and names the index in requests and results
//! - `indexed_attrs` is a comma-separated string or a list; blanks are
//!   dropped and an empty list falls back to `[id]`
//! - `default_operator` is `or` unless given

mod errors;

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::observability::{Event, Logger};
use crate::query::Operator;

pub use errors::{ConfigError, ConfigResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Index identifier
    pub id: String,
    /// Document attributes read in order; the first with a value wins
    pub indexed_attrs: Vec<String>,
    /// Operator used when a query names none
    pub default_operator: Operator,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttrList {
    Joined(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    id: String,
    #[serde(default)]
    indexed_attrs: Option<AttrList>,
    #[serde(default)]
    default_operator: Operator,
}

impl IndexConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            indexed_attrs: Vec::new(),
            default_operator: Operator::Or,
        }
    }

    /// Set indexed attributes from a comma-separated list.
    pub fn with_indexed_attrs(mut self, attrs: &str) -> Self {
        self.indexed_attrs = split_attrs(attrs.split(','));
        self
    }

    pub fn with_default_operator(mut self, operator: Operator) -> Self {
        self.default_operator = operator;
        self
    }

    /// Attributes values are read from, defaulting to the index id.
    pub fn source_names(&self) -> Vec<String> {
        if self.indexed_attrs.is_empty() {
            vec![self.id.clone()]
        } else {
            self.indexed_attrs.clone()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("index id must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let raw: RawConfig = serde_json::from_str(s)?;
        let indexed_attrs = match raw.indexed_attrs {
            None => Vec::new(),
            Some(AttrList::Joined(joined)) => split_attrs(joined.split(',')),
            Some(AttrList::List(list)) => split_attrs(list.iter().map(String::as_str)),
        };

        let config = Self {
            id: raw.id.trim().to_string(),
            indexed_attrs,
            default_operator: raw.default_operator,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: &Path, logger: &Logger) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;

        let path_str = path.display().to_string();
        logger.info(
            Event::ConfigLoaded,
            &[("index", config.id.as_str()), ("path", path_str.as_str())],
        );
        Ok(config)
    }
}

fn split_attrs<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndexConfig::new("color");
        assert_eq!(config.default_operator, Operator::Or);
        assert_eq!(config.source_names(), vec!["color".to_string()]);
    }

    #[test]
    fn test_indexed_attrs_split_and_trimmed() {
        let config = IndexConfig::new("color").with_indexed_attrs(" color, ,colour ,");
        assert_eq!(config.source_names(), vec!["color".to_string(), "colour".to_string()]);

        let config = IndexConfig::new("color").with_indexed_attrs(" , ");
        assert_eq!(config.source_names(), vec!["color".to_string()]);
    }

    #[test]
    fn test_from_json_joined_and_list() {
        let joined =
            IndexConfig::from_json_str(r#"{"id": "size", "indexed_attrs": "a, b"}"#).unwrap();
        let list =
            IndexConfig::from_json_str(r#"{"id": "size", "indexed_attrs": ["a", " b "]}"#).unwrap();
        assert_eq!(joined, list);
        assert_eq!(joined.indexed_attrs, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_from_json_operator() {
        let config =
            IndexConfig::from_json_str(r#"{"id": "size", "default_operator": "and"}"#).unwrap();
        assert_eq!(config.default_operator, Operator::And);

        let err = IndexConfig::from_json_str(r#"{"id": "size", "default_operator": "xor"}"#)
            .unwrap_err();
        assert_eq!(err.code(), "BIDEX_CONFIG_PARSE");
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = IndexConfig::from_json_str(r#"{"id": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = IndexConfig::from_json_str(r#"{"id": "a", "sharding": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
