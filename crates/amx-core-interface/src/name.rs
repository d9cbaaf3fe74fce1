//! Structured object names (`domain:key=value,...`)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// String form of the reserved "no object" name
pub const NULL_OBJECT_NAME_STR: &str = "null:type=Null,name=Null";

/// Reserved name used by remote beans to report a null reference.
///
/// A reference-valued attribute equal to this name means "no object" and
/// must never be wrapped in a proxy.
pub static NULL_OBJECT_NAME: Lazy<ObjectName> = Lazy::new(|| ObjectName {
    domain: "null".to_string(),
    properties: vec![
        ("type".to_string(), "Null".to_string()),
        ("name".to_string(), "Null".to_string()),
    ],
    canonical: "null:name=Null,type=Null".to_string(),
});

const RESERVED: &[char] = &[':', ',', '=', '*', '?', '"'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed object name {name:?}: {reason}")]
pub struct MalformedObjectName {
    pub name: String,
    pub reason: &'static str,
}

/// Address of a remote management bean.
///
/// Equality and hashing use the canonical form, where key properties are
/// sorted by key, so `a:x=1,y=2` equals `a:y=2,x=1`. `Display` keeps the
/// order the name was written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
    canonical: String,
}

impl ObjectName {
    /// Parse a name, same as `str::parse`
    pub fn new(name: &str) -> Result<Self, MalformedObjectName> {
        name.parse()
    }

    /// The domain part (before the colon); may be empty
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of a key property, if present
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Key properties in written order
    pub fn key_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical
    }

    /// Whether this is the reserved null name
    pub fn is_null(&self) -> bool {
        *self == *NULL_OBJECT_NAME
    }
}

impl FromStr for ObjectName {
    type Err = MalformedObjectName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| MalformedObjectName {
            name: s.to_string(),
            reason,
        };

        let (domain, rest) = s.split_once(':').ok_or_else(|| malformed("missing ':'"))?;
        if domain.contains(RESERVED) {
            return Err(malformed("invalid character in domain"));
        }
        if rest.is_empty() {
            return Err(malformed("no key properties"));
        }

        let mut properties: Vec<(String, String)> = Vec::new();
        for pair in rest.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| malformed("key property without '='"))?;
            if key.is_empty() {
                return Err(malformed("empty key"));
            }
            if key.contains(RESERVED) || value.contains(RESERVED) {
                return Err(malformed("invalid character in key property"));
            }
            if properties.iter().any(|(k, _)| k == key) {
                return Err(malformed("duplicate key"));
            }
            properties.push((key.to_string(), value.to_string()));
        }

        let mut sorted: Vec<_> = properties.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let canonical = format!(
            "{}:{}",
            domain,
            sorted
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(",")
        );

        Ok(Self {
            domain: domain.to_string(),
            properties,
            canonical,
        })
    }
}

impl TryFrom<String> for ObjectName {
    type Error = MalformedObjectName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectName> for String {
    fn from(name: ObjectName) -> Self {
        name.to_string()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}
