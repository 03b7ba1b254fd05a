//! Horse records as consumed by the rest of the crate.
//!
//! The hosted store hands back loosely typed rows: ids may arrive as numbers
//! or strings, ages as numbers or numeric strings, optional references as
//! empty strings. Everything is mapped at this boundary into [`Horse`], so
//! nothing downstream has to second-guess a record's shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque identifier assigned by the record store.
///
/// This is the only relationship key; names are never used to link horses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HorseId(String);

impl HorseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HorseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HorseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HorseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// Sex
// =============================================================================

/// Sex of a horse; decides which parent role it can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Canonical label written to the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a label is neither male nor female in any known spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sex label '{0}'")]
pub struct UnknownSex(pub String);

impl FromStr for Sex {
    type Err = UnknownSex;

    /// Accepts the canonical labels and their localized spellings, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "macho" | "m" => Ok(Self::Male),
            "female" | "fêmea" | "femea" | "f" => Ok(Self::Female),
            _ => Err(UnknownSex(s.to_string())),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// Errors raised when a stored row cannot be turned into a [`Horse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("record field `{field}` has unsupported value {value}")]
    InvalidField { field: &'static str, value: String },
}

/// A row exactly as the store returns it, before normalization.
///
/// Keys follow the store's camelCase columns; snake_case spellings are
/// accepted as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHorse {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default, rename = "photoUrl", alias = "photo_url")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "fatherId", alias = "father_id")]
    pub father_id: Value,
    #[serde(default, rename = "motherId", alias = "mother_id")]
    pub mother_id: Value,
}

/// A registered horse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawHorse")]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub breed: String,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub photo_url: Option<String>,
    pub father_id: Option<HorseId>,
    pub mother_id: Option<HorseId>,
}

impl Horse {
    /// A horse with only identity set; remaining fields are filled with the
    /// `with_*` builders.
    pub fn new(id: impl Into<HorseId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            breed: String::new(),
            age: None,
            sex: None,
            photo_url: None,
            father_id: None,
            mother_id: None,
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = breed.into();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_father(mut self, id: impl Into<HorseId>) -> Self {
        self.father_id = Some(id.into());
        self
    }

    pub fn with_mother(mut self, id: impl Into<HorseId>) -> Self {
        self.mother_id = Some(id.into());
        self
    }

    /// Maps a batch of store rows, dropping the ones that do not fit.
    pub fn decode_rows(rows: Vec<Value>) -> Vec<Horse> {
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<Horse>(row) {
                Ok(horse) => Some(horse),
                Err(e) => {
                    tracing::warn!("Skipping malformed horse record: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl TryFrom<RawHorse> for Horse {
    type Error = RecordError;

    fn try_from(raw: RawHorse) -> Result<Self, Self::Error> {
        let id = id_from_value("id", &raw.id)?.ok_or(RecordError::MissingField("id"))?;

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(RecordError::MissingField("name"))?;

        Ok(Self {
            id,
            name,
            breed: raw.breed.unwrap_or_default(),
            age: age_from_value(&raw.age),
            sex: raw.sex.as_deref().and_then(|s| s.parse().ok()),
            photo_url: raw.photo_url.filter(|url| !url.trim().is_empty()),
            father_id: id_from_value("fatherId", &raw.father_id)?,
            mother_id: id_from_value("motherId", &raw.mother_id)?,
        })
    }
}

/// Reads an identifier column. Null and blank strings mean "no reference".
fn id_from_value(field: &'static str, value: &Value) -> Result<Option<HorseId>, RecordError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(HorseId::new(s.trim()))),
        Value::Number(n) => Ok(Some(HorseId::new(n.to_string()))),
        other => Err(RecordError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

/// Reads the age column; anything that is not a non-negative integer is dropped.
fn age_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Insert payload for a new horse.
///
/// Absent optional fields are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHorse {
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub sex: Sex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_id: Option<HorseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<HorseId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_ids_become_text() {
        let horse: Horse =
            serde_json::from_value(json!({"id": 7, "name": "Ventura", "fatherId": 3})).unwrap();
        assert_eq!(horse.id.as_str(), "7");
        assert_eq!(horse.father_id, Some(HorseId::new("3")));
        assert_eq!(horse.mother_id, None);
    }

    #[test]
    fn test_blank_references_are_absent() {
        let horse: Horse = serde_json::from_value(json!({
            "id": "a1",
            "name": "Brisa",
            "fatherId": "",
            "motherId": "  ",
            "photoUrl": ""
        }))
        .unwrap();
        assert_eq!(horse.father_id, None);
        assert_eq!(horse.mother_id, None);
        assert_eq!(horse.photo_url, None);
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = Horse::try_from(RawHorse {
            id: json!(1),
            ..RawHorse::default()
        })
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField("name"));
    }

    #[test]
    fn test_sex_aliases() {
        assert_eq!("Macho".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("FÊMEA".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" female ".parse::<Sex>().unwrap(), Sex::Female);
        assert!("gelding".parse::<Sex>().is_err());
    }
}
