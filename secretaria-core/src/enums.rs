//! Enum types for secretariat entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE ENUMS
// ============================================================================

/// Registered sex of a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn as_code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    /// Parse from a form code, ignoring case and surrounding whitespace.
    pub fn from_code(s: &str) -> Result<Self, EnumParseError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(EnumParseError {
                kind: "sex",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle status of a teacher or course.
///
/// Any status string the backend sends besides `ATIVO`/`INATIVO` decodes as
/// `Unknown`, so one odd record does not fail a whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "ATIVO")]
    Active,
    #[serde(rename = "INATIVO")]
    Inactive,
    #[serde(rename = "DESCONHECIDO", other)]
    Unknown,
}

impl Status {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Status::Active => "ATIVO",
            Status::Inactive => "INATIVO",
            Status::Unknown => "DESCONHECIDO",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATIVO" | "ACTIVE" => Ok(Status::Active),
            "INATIVO" | "INACTIVE" => Ok(Status::Inactive),
            other => Err(EnumParseError {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Entity type discriminator, used to partition cache keys and label logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Teacher,
    Course,
    Secretariat,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Teacher,
        EntityKind::Course,
        EntityKind::Secretariat,
    ];
}

// ============================================================================
// DISPLAY / FROMSTR
// ============================================================================

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for Sex {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Status {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EntityKind::Teacher => "Teacher",
            EntityKind::Course => "Course",
            EntityKind::Secretariat => "Secretariat",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for EntityKind {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "teacher" | "professor" => Ok(EntityKind::Teacher),
            "course" | "curso" => Ok(EntityKind::Course),
            "secretariat" | "secretaria" => Ok(EntityKind::Secretariat),
            other => Err(EnumParseError {
                kind: "entity kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Error when parsing an invalid enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parses_case_insensitively() {
        assert_eq!("m".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!(" F ".parse::<Sex>().unwrap(), Sex::Female);
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "\"ATIVO\"");
        assert_eq!(
            serde_json::from_str::<Status>("\"INATIVO\"").unwrap(),
            Status::Inactive
        );
        assert_eq!("active".parse::<Status>().unwrap(), Status::Active);
    }

    #[test]
    fn test_unrecognised_status_decodes_as_unknown() {
        assert_eq!(
            serde_json::from_str::<Status>("\"SUSPENSO\"").unwrap(),
            Status::Unknown
        );
        assert!("SUSPENSO".parse::<Status>().is_err());
    }

    #[test]
    fn test_entity_kind_roundtrip_display() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }
}
