//! Passenger record and store selection
//!
//! A `Passenger` is one row of the dataset. Field names on the Rust side
//! follow the internal column names of the backing file (`PassengerId`,
//! `SibSp`, ...); the external names used in responses and attribute
//! filters live in [`crate::attribute`].

use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// One passenger entry, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Passenger {
    #[serde(deserialize_with = "blank_as_default")]
    pub passenger_id: i64,
    #[serde(deserialize_with = "blank_as_default")]
    pub survived: i64,
    #[serde(deserialize_with = "blank_as_default")]
    pub pclass: i64,
    pub name: String,
    pub sex: String,
    /// Kept as text: the source has blanks and fractional ages.
    pub age: String,
    #[serde(deserialize_with = "blank_as_default")]
    pub sib_sp: i64,
    #[serde(deserialize_with = "blank_as_default")]
    pub parch: i64,
    pub ticket: String,
    #[serde(deserialize_with = "blank_as_default")]
    pub fare: f64,
    pub cabin: String,
    pub embarked: String,
}

/// Blank numeric cells load as zero instead of failing the whole file.
fn blank_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a caller-supplied passenger identifier.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
}

/// Backend selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreType {
    /// Flat CSV file
    Tabular,
    /// Embedded SQLite database
    Relational,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Tabular => "csv",
            StoreType::Relational => "sqlite",
        }
    }

    /// Environment variable that carries the path for this backend.
    pub fn path_env_var(&self) -> &'static str {
        match self {
            StoreType::Tabular => "CSV_STORE_PATH",
            StoreType::Relational => "SQLITE_STORE_PATH",
        }
    }
}

impl FromStr for StoreType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "tabular" => Ok(StoreType::Tabular),
            "sqlite" | "relational" => Ok(StoreType::Relational),
            _ => Err(Error::Config(format!("unsupported store type: {}", s))),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_aliases() {
        assert_eq!("CSV".parse::<StoreType>().unwrap(), StoreType::Tabular);
        assert_eq!("tabular".parse::<StoreType>().unwrap(), StoreType::Tabular);
        assert_eq!("SQLITE".parse::<StoreType>().unwrap(), StoreType::Relational);
        assert_eq!("relational".parse::<StoreType>().unwrap(), StoreType::Relational);
        assert!(matches!("postgres".parse::<StoreType>(), Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("invalid-id"), Err(Error::InvalidIdentifier(raw)) if raw == "invalid-id"));
        assert!(matches!(parse_id(""), Err(Error::InvalidIdentifier(_))));
    }
}
