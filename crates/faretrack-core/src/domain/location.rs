use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const LOCATION_CODE_LEN: usize = 3;

/// Normalized IATA-style location code (airport or city).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationCode(String);

impl LocationCode {
    /// Parse and normalize a location code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyLocationCode);
        }

        let normalized = trimmed.to_ascii_uppercase();
        if normalized.chars().count() != LOCATION_CODE_LEN {
            return Err(ValidationError::LocationCodeBadLength {
                value: trimmed.to_owned(),
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(ValidationError::LocationCodeInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LocationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for LocationCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for LocationCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LocationCode> for String {
    fn from(value: LocationCode) -> Self {
        value.0
    }
}
