//! Insertion-ordered element attributes.

use serde::{Deserialize, Serialize};

/// Authoring key that serializes as the `class` attribute.
pub const CLASS_ALIAS: &str = "klass";

/// Element attributes, rendered in insertion order.
///
/// Values are written verbatim between double quotes; callers own any
/// escaping of attribute values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a `class` attribute via its authoring alias.
    pub fn klass(self, value: impl Into<String>) -> Self {
        self.with(CLASS_ALIAS, value)
    }

    /// Append an attribute in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Look up the first value for `key`, as authored.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs as authored.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as ` key="value"` pairs, mapping the class alias.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            out.push(' ');
            out.push_str(serialized_key(key));
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn serialized_key(key: &str) -> &str {
    if key == CLASS_ALIAS {
        "class"
    } else {
        key
    }
}
