//! Storage area letter.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing an [`AreaName`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AreaNameError {
    /// The input string is empty.
    #[error("area name cannot be empty")]
    Empty,
    /// The input is not exactly one ASCII letter.
    #[error("area name must be a single letter A-Z, got {0:?}")]
    NotALetter(String),
}

/// Name of a storage area: one letter, unique within its factory.
///
/// Lowercase input is normalized to uppercase.
///
/// ```
/// use factory_inventory_core::AreaName;
///
/// assert_eq!(AreaName::parse("b").unwrap().as_char(), 'B');
/// assert!(AreaName::parse("AB").is_err());
/// assert!(AreaName::parse("1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AreaName(char);

impl AreaName {
    /// Parse an `AreaName`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the trimmed input is exactly one ASCII letter.
    pub fn parse(s: &str) -> Result<Self, AreaNameError> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(AreaNameError::Empty),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Self(c.to_ascii_uppercase())),
            _ => Err(AreaNameError::NotALetter(trimmed.to_owned())),
        }
    }

    /// The letter.
    #[must_use]
    pub const fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for AreaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AreaName {
    type Error = AreaNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AreaName> for String {
    fn from(name: AreaName) -> Self {
        name.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(AreaName::parse(" c "), Ok(AreaName('C')));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(AreaName::parse(""), Err(AreaNameError::Empty));
        assert!(matches!(
            AreaName::parse("AA"),
            Err(AreaNameError::NotALetter(_))
        ));
        assert!(matches!(
            AreaName::parse("\u{3042}"),
            Err(AreaNameError::NotALetter(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(AreaName('Z').to_string(), "Z");
    }
}
