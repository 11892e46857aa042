//! Typed configuration store
//!
//! Section/key access to the merged configuration with the value coerced
//! to the type the caller asks for. Values written by hand in a TOML file
//! or an environment variable are often strings; `"yes"`, `"8080"` and
//! `"basic, none"` are accepted wherever a boolean, an integer or a list
//! is expected.

use std::fmt;

use bcon_domain::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::AppConfig;
use crate::config::types::global::split_lower;

/// Type requested from [`TypedConfigStore::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// Plain string
    String,
    /// Signed integer
    Integer,
    /// Boolean (`true/false`, `yes/no`, `on/off`, `1/0`)
    Boolean,
    /// List of strings, a string value is split on commas
    List,
    /// Like [`List`](Self::List), every item lower-cased
    StringLowerList,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::StringLowerList => "string_lower_list",
        })
    }
}

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// List value
    List(Vec<String>),
}

impl ConfigValue {
    /// The string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The list, if this is one
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Read-only view over named sections of typed keys
#[derive(Debug, Clone, Default)]
pub struct TypedConfigStore {
    sections: Map<String, Value>,
}

impl TypedConfigStore {
    /// Build a store from a loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::from_value(serde_json::to_value(config)?)
    }

    /// Build a store from a JSON object of sections
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            Value::Null => Ok(Self::default()),
            other => Err(Error::config(format!(
                "Configuration root must be a table of sections, got {other}"
            ))),
        }
    }

    /// Section names
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Whether `section` exists
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Read `key` from `section` as `kind`
    ///
    /// A missing key (or section) yields `default`; with no default it is
    /// a configuration error. A present value that cannot be read as
    /// `kind` is always an error.
    pub fn get(
        &self,
        key: &str,
        kind: ConfigKind,
        section: &str,
        default: Option<ConfigValue>,
    ) -> Result<ConfigValue> {
        let Some(raw) = self.raw(section, key) else {
            return default.ok_or_else(|| {
                Error::config(format!("Missing mandatory option '{key}' in [{section}]"))
            });
        };

        coerce(raw, kind).ok_or_else(|| {
            Error::config(format!(
                "Option '{key}' in [{section}] is not a valid {kind}: {raw}"
            ))
        })
    }

    /// String option with a default
    pub fn get_string(&self, key: &str, section: &str, default: &str) -> Result<String> {
        match self.get(key, ConfigKind::String, section, Some(default.into()))? {
            ConfigValue::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }

    /// Integer option with a default
    pub fn get_integer(&self, key: &str, section: &str, default: i64) -> Result<i64> {
        let value = self.get(key, ConfigKind::Integer, section, Some(default.into()))?;
        Ok(value.as_i64().unwrap_or(default))
    }

    /// Boolean option with a default
    pub fn get_bool(&self, key: &str, section: &str, default: bool) -> Result<bool> {
        let value = self.get(key, ConfigKind::Boolean, section, Some(default.into()))?;
        Ok(value.as_bool().unwrap_or(default))
    }

    /// Lower-cased list option with a default
    pub fn get_lower_list(&self, key: &str, section: &str, default: &[&str]) -> Result<Vec<String>> {
        let default: Vec<String> = default.iter().map(|s| s.to_lowercase()).collect();
        let value = self.get(
            key,
            ConfigKind::StringLowerList,
            section,
            Some(default.clone().into()),
        )?;
        Ok(match value {
            ConfigValue::List(items) => items,
            _ => default,
        })
    }

    fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.sections
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(section))
            .and_then(|(_, value)| value.as_object())
    }

    fn raw(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section)?
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
            .filter(|value| !value.is_null())
    }
}

fn coerce(raw: &Value, kind: ConfigKind) -> Option<ConfigValue> {
    match kind {
        ConfigKind::String => scalar_string(raw).map(ConfigValue::String),
        ConfigKind::Integer => match raw {
            Value::Number(n) => n.as_i64().map(ConfigValue::Integer),
            Value::String(s) => s.trim().parse().ok().map(ConfigValue::Integer),
            _ => None,
        },
        ConfigKind::Boolean => match raw {
            Value::Bool(b) => Some(ConfigValue::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(ConfigValue::Boolean(false)),
                Some(1) => Some(ConfigValue::Boolean(true)),
                _ => None,
            },
            Value::String(s) => parse_bool(s).map(ConfigValue::Boolean),
            _ => None,
        },
        ConfigKind::List => list(raw, false).map(ConfigValue::List),
        ConfigKind::StringLowerList => list(raw, true).map(ConfigValue::List),
    }
}

fn scalar_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn list(raw: &Value, lower: bool) -> Option<Vec<String>> {
    let items: Vec<String> = match raw {
        Value::Array(items) => items
            .iter()
            .map(scalar_string)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) if lower => return Some(split_lower(s)),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    Some(if lower {
        items.into_iter().map(|item| item.to_lowercase()).collect()
    } else {
        items
    })
}
