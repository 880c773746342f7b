//! The payload type for HTTP request pipelines.

use std::collections::BTreeMap;

/// Request parameters as a key → list-of-values mapping.
///
/// This is the message payload the inbound gateway publishes: every query
/// parameter of the external request, with repeated keys collected in
/// arrival order. Handlers read it through narrow accessors instead of
/// downcasting an untyped payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects decoded key/value pairs, preserving value order per key.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    /// Returns the first value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key` (empty when absent).
    pub fn all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces whatever `key` held with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Appends a value to `key`'s list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
