//! Tolerant traversal of loosely-typed API documents.
//!
//! Upstream documents are inconsistently populated, so every step of a
//! [`Lookup`] yields an absent value instead of failing when a key is
//! missing, null, or of the wrong type.

use serde_json::Value;

/// Optional-chaining cursor into a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    value: Option<&'a Value>,
}

impl<'a> Lookup<'a> {
    /// Starts a lookup at the document root.
    #[must_use]
    pub fn new(root: &'a Value) -> Self {
        Self { value: Some(root) }
    }

    /// Descends into an object key.
    #[must_use]
    pub fn key(self, key: &str) -> Self {
        Self {
            value: self.value.and_then(|v| v.as_object()).and_then(|o| o.get(key)),
        }
    }

    /// Descends into an array element.
    #[must_use]
    pub fn index(self, index: usize) -> Self {
        Self {
            value: self
                .value
                .and_then(|v| v.as_array())
                .and_then(|a| a.get(index)),
        }
    }

    /// Follows a dotted path where numeric segments index arrays.
    #[must_use]
    pub fn path(self, path: &str) -> Self {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .fold(self, |cursor, segment| match segment.parse::<usize>() {
                Ok(index) => cursor.index(index),
                Err(_) => cursor.key(segment),
            })
    }

    /// Returns the current value unless it is absent or null.
    #[must_use]
    pub fn value(self) -> Option<&'a Value> {
        self.value.filter(|v| !v.is_null())
    }

    /// Returns the value when it is a JSON string.
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// Returns a non-empty string value, owned.
    #[must_use]
    pub fn string(self) -> Option<String> {
        self.as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns strings and numbers rendered for display; other types are absent.
    #[must_use]
    pub fn display_string(self) -> Option<String> {
        match self.value()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
