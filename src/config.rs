//! Configuration tree consumed by the resolver.
//!
//! Loading configuration from disk is the caller's concern. The resolver only
//! needs two operations: fetch a sub-section by name, and fetch a scalar by
//! dotted key. [`Config`] offers both over an already-parsed JSON object.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::{DiError, DiResult};

/// Hierarchical configuration backed by a JSON object.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::Config;
/// use serde_json::json;
///
/// let config = Config::from_value(json!({
///     "application": { "class": { "suffix": "Service" }, "page_size": 25 }
/// })).unwrap();
///
/// assert_eq!(config.value("application.class.suffix").as_deref(), Some("Service"));
/// assert_eq!(config.value("application.page_size").as_deref(), Some("25"));
///
/// let app = config.section("application").unwrap();
/// assert_eq!(app.value("class.suffix").as_deref(), Some("Service"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: Map<String, JsonValue>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON object. Anything other than an object is rejected.
    pub fn from_value(value: JsonValue) -> DiResult<Self> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            other => Err(DiError::InvalidConfiguration(format!(
                "expected an object at the configuration root, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parses a JSON document into a configuration tree.
    pub fn from_json_str(source: &str) -> DiResult<Self> {
        let value: JsonValue = serde_json::from_str(source)
            .map_err(|e| DiError::InvalidConfiguration(e.to_string()))?;
        Self::from_value(value)
    }

    /// Returns the sub-section at `name` (dotted paths allowed) if it is an object.
    pub fn section(&self, name: &str) -> Option<Config> {
        match self.lookup(name)? {
            JsonValue::Object(map) => Some(Config { root: map.clone() }),
            _ => None,
        }
    }

    /// Returns the scalar at `key` rendered as a string.
    ///
    /// Nulls, arrays and objects yield `None`.
    pub fn value(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Bool(b) => Some(b.to_string()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// Raw JSON lookup by dotted key.
    pub fn lookup(&self, key: &str) -> Option<&JsonValue> {
        let mut parts = key.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Deserializes the whole tree into a typed settings struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> DiResult<T> {
        serde_json::from_value(JsonValue::Object(self.root.clone()))
            .map_err(|e| DiError::InvalidConfiguration(e.to_string()))
    }

    /// True if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub(crate) fn shared_section(&self, name: &str) -> Arc<Config> {
        Arc::new(self.section(name).unwrap_or_default())
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn rejects_non_object_root() {
        let err = Config::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DiError::InvalidConfiguration(ref m) if m.contains("an array")));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(DiError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn dotted_lookup_walks_nested_objects() {
        let config = Config::from_value(json!({
            "data_access": { "class": { "prefix": "Pg", "suffix": "Repo" } },
            "flag": true,
            "nothing": null,
        }))
        .unwrap();

        assert_eq!(config.value("data_access.class.prefix").as_deref(), Some("Pg"));
        assert_eq!(config.value("flag").as_deref(), Some("true"));
        assert_eq!(config.value("nothing"), None);
        assert_eq!(config.value("data_access.class"), None);
        assert_eq!(config.value("data_access.class.prefix.deeper"), None);
        assert_eq!(config.value("missing.key"), None);
    }

    #[test]
    fn section_of_scalar_is_none() {
        let config = Config::from_value(json!({ "application": "oops" })).unwrap();
        assert!(config.section("application").is_none());
        assert!(config.shared_section("application").is_empty());
    }

    #[test]
    fn deserializes_typed_settings() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Paging {
            page_size: u32,
            #[serde(default)]
            strict: bool,
        }

        let config = Config::from_json_str(r#"{ "page_size": 50 }"#).unwrap();
        let paging: Paging = config.deserialize().unwrap();
        assert_eq!(paging, Paging { page_size: 50, strict: false });
    }
}
