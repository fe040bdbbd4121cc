use serde_yaml::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Top-level mapping key under which all caldera configuration lives.
pub const ROOT_KEY: &str = "emr";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("configuration document has no `{ROOT_KEY}` mapping at the top level")]
    MissingRoot,
    #[error("missing configuration field: {0}")]
    MissingConfigurationField(String),
    #[error("invalid configuration value for `{key}`: expected {expected}, found {found}")]
    InvalidConfigurationValue {
        key: String,
        expected: &'static str,
        found: String,
    },
}

/// A parsed configuration document, rooted at the `emr:` mapping.
///
/// Accessors take a dotted path relative to the root (`ec2.key_pair`) and
/// fail with an error naming that exact path. Required fields have no
/// defaults; absence is a hard error, not a default-filled gap.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn parse_str(input: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(input)?;
        let root = doc
            .as_mapping()
            .and_then(|m| m.get(ROOT_KEY))
            .ok_or(ConfigError::MissingRoot)?;
        if !root.is_mapping() {
            return Err(ConfigError::MissingRoot);
        }
        Ok(Self { root: root.clone() })
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Fetch a required string field at a dotted path.
    ///
    /// Required fields are all names or identifiers; an empty string is
    /// never a usable value, so it is rejected here with the key named
    /// rather than surfacing later as a broken reference.
    pub fn str_at(&self, path: &str) -> Result<&str, ConfigError> {
        let value = self
            .lookup(path)
            .ok_or_else(|| ConfigError::MissingConfigurationField(path.to_owned()))?;
        let s = value
            .as_str()
            .ok_or_else(|| ConfigError::InvalidConfigurationValue {
                key: path.to_owned(),
                expected: "a string",
                found: value_kind(value).to_owned(),
            })?;
        if s.trim().is_empty() {
            return Err(ConfigError::InvalidConfigurationValue {
                key: path.to_owned(),
                expected: "a non-empty string",
                found: "an empty string".to_owned(),
            });
        }
        Ok(s)
    }

    /// Fetch an optional positive integer field at a dotted path.
    ///
    /// Returns `Ok(None)` when the key is absent; a present key with the
    /// wrong shape (non-integer, zero, negative) is still a hard error.
    pub fn count_at(&self, path: &str) -> Result<Option<u32>, ConfigError> {
        let Some(value) = self.lookup(path) else {
            return Ok(None);
        };
        let invalid = |found: String| ConfigError::InvalidConfigurationValue {
            key: path.to_owned(),
            expected: "a positive integer",
            found,
        };
        let n = value
            .as_u64()
            .ok_or_else(|| invalid(value_kind(value).to_owned()))?;
        if n == 0 {
            return Err(invalid("0".to_owned()));
        }
        u32::try_from(n).map(Some).map_err(|_| invalid(n.to_string()))
    }

    /// Fetch an optional string field at a dotted path.
    pub fn opt_str_at(&self, path: &str) -> Result<Option<&str>, ConfigError> {
        let Some(value) = self.lookup(path) else {
            return Ok(None);
        };
        value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidConfigurationValue {
                key: path.to_owned(),
                expected: "a string",
                found: value_kind(value).to_owned(),
            })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
