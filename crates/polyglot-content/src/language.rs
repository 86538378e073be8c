//! Language codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language code such as `en`, `es` or `pt-br`.
///
/// Codes start with at least two ASCII letters and may carry further
/// hyphen-separated ASCII alphanumeric subtags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and validate a language code.
    pub fn parse(code: &str) -> Result<Self, LanguageError> {
        let mut parts = code.split('-');
        let primary = parts.next().unwrap_or_default();

        if primary.len() < 2 || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LanguageError::Invalid(code.to_string()));
        }

        for subtag in parts {
            if subtag.is_empty() || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LanguageError::Invalid(code.to_string()));
            }
        }

        Ok(Self(code.to_string()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    /// English, the usual source language.
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors produced when parsing a language code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    #[error("Invalid language code: {0:?}")]
    Invalid(String),
}
