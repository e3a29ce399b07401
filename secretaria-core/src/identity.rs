//! Identity types for secretariat entities
//!
//! The backend hands out opaque string identifiers, so every id here is a
//! serde-transparent newtype over `String`. The tenant id is the only one with
//! parsing rules because every fetch and cache key is partitioned by it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SessionError;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Literal values that leak out of a broken session and must never reach a URL.
const PLACEHOLDER_IDS: [&str; 2] = ["undefined", "null"];

/// Identifier of the owning secretariat (the tenant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretariatId(String);

impl SecretariatId {
    /// Parse a tenant id, trimming surrounding whitespace.
    ///
    /// Rejects empty input and the `"undefined"` / `"null"` placeholders.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, SessionError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || PLACEHOLDER_IDS.contains(&trimmed) {
            return Err(SessionError::InvalidTenant {
                value: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretariatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a teacher record (`id_professor` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub String);

/// Identifier of a course record (`id_curso` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl TeacherId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secretariat_id_trims() {
        let id = SecretariatId::parse("  abc-123 ").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_secretariat_id_rejects_placeholders() {
        assert!(SecretariatId::parse("").is_err());
        assert!(SecretariatId::parse("   ").is_err());
        assert!(SecretariatId::parse("undefined").is_err());
        assert!(SecretariatId::parse("null").is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = SecretariatId::parse("42").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        let teacher: TeacherId = serde_json::from_str("\"t-1\"").unwrap();
        assert_eq!(teacher, TeacherId::new("t-1"));
    }
}
