//! Fully qualified references to other entities on the platform.
//!
//! Sequences compose actions by name; on the wire a component is a
//! slash-separated path with a leading slash, e.g. `/whisk.system/utils/echo`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::size::Sizeable;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("fully qualified entity name must be a string")]
    NotAString,
    #[error("'{0}' is not a valid fully qualified entity name")]
    Malformed(String),
}

/// A namespace-qualified entity name. The first path segment is the
/// namespace; any remaining segments (package, entity) join into the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullyQualifiedName {
    namespace: String,
    name: String,
}

impl FullyQualifiedName {
    /// Parses `ns/name` or `/ns/pkg/name`. Requires at least two non-empty,
    /// whitespace-free segments.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        let trimmed = s.trim();
        let path = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 2
            || segments
                .iter()
                .any(|seg| seg.is_empty() || seg.contains(char::is_whitespace))
        {
            return Err(NameError::Malformed(s.to_string()));
        }
        Ok(Self {
            namespace: segments[0].to_string(),
            name: segments[1..].join("/"),
        })
    }

    pub fn from_json(value: &Value) -> Result<Self, NameError> {
        value
            .as_str()
            .ok_or(NameError::NotAString)
            .and_then(Self::parse)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire projection: the full path with a leading slash.
    pub fn qualified_name(&self) -> String {
        format!("/{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.namespace, self.name)
    }
}

impl FromStr for FullyQualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FullyQualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.qualified_name())
    }
}

impl<'de> Deserialize<'de> for FullyQualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Sizeable for FullyQualifiedName {
    fn size_in_bytes(&self) -> usize {
        // "/" + namespace + "/" + name
        2 + self.namespace.len() + self.name.len()
    }
}
