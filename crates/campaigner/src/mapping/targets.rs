use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A mapping target: one contact field or one template parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKey {
    Phone,
    Fullname,
    Email,
    Custom(String),
    Header(usize),
    Body(usize),
    Button(usize),
}

impl TargetKey {
    /// Returns true for the only mandatory mapping target.
    pub fn is_required(&self) -> bool {
        matches!(self, TargetKey::Phone)
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Phone => write!(f, "phone"),
            TargetKey::Fullname => write!(f, "fullname"),
            TargetKey::Email => write!(f, "email"),
            TargetKey::Custom(key) => write!(f, "custom.{}", key),
            TargetKey::Header(i) => write!(f, "header_{}", i),
            TargetKey::Body(i) => write!(f, "body_{}", i),
            TargetKey::Button(i) => write!(f, "button_{}", i),
        }
    }
}

impl FromStr for TargetKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" => return Ok(TargetKey::Phone),
            "fullname" => return Ok(TargetKey::Fullname),
            "email" => return Ok(TargetKey::Email),
            _ => {}
        }
        if let Some(key) = s.strip_prefix("custom.") {
            if key.is_empty() {
                return Err(format!("Empty custom field key in '{}'", s));
            }
            return Ok(TargetKey::Custom(key.to_string()));
        }
        for (prefix, build) in [
            ("header_", TargetKey::Header as fn(usize) -> TargetKey),
            ("body_", TargetKey::Body as fn(usize) -> TargetKey),
            ("button_", TargetKey::Button as fn(usize) -> TargetKey),
        ] {
            if let Some(index) = s.strip_prefix(prefix) {
                return index
                    .parse::<usize>()
                    .map(build)
                    .map_err(|_| format!("Invalid slot index in '{}'", s));
            }
        }
        Err(format!("Unknown target key '{}'", s))
    }
}

impl Serialize for TargetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A contact target-field definition from the contact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactField {
    /// Stable field key (`phone`, `fullname`, `email`, or a custom key).
    pub key: String,
    /// Display label, used as an additional matching keyword.
    pub label: String,
    /// `phone` is the only required field.
    #[serde(default)]
    pub required: bool,
}

impl ContactField {
    pub fn target_key(&self) -> TargetKey {
        match self.key.as_str() {
            "phone" => TargetKey::Phone,
            "fullname" => TargetKey::Fullname,
            "email" => TargetKey::Email,
            other => TargetKey::Custom(other.to_string()),
        }
    }
}

/// A mapping from target keys to source column names.
///
/// At most one source column per target key, and a column may back at most
/// one target key; `set` evicts any previous use of the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: BTreeMap<TargetKey, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a source column to a target key, evicting any prior
    /// assignment of the same column to a different key.
    pub fn set(&mut self, key: TargetKey, column: impl Into<String>) {
        let column = column.into();
        self.entries.retain(|_, c| *c != column);
        self.entries.insert(key, column);
    }

    pub fn remove(&mut self, key: &TargetKey) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &TargetKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_column_used(&self, column: &str) -> bool {
        self.entries.values().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TargetKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Returns true when the only mandatory key is mapped.
    pub fn has_phone(&self) -> bool {
        self.entries.contains_key(&TargetKey::Phone)
    }
}
