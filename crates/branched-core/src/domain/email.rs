use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An address that passed the format check, stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_email(raw).ok_or(CoreError::EmptyEmail)?;
        if !is_valid_email(&normalized) {
            return Err(CoreError::InvalidEmail(raw.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaitlistEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Coarse `local@domain.tld` shape: non-blank runs around `@` and a later `.`.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    // A later `@` only shortens the domain.
    let Some(at) = value
        .char_indices()
        .skip(1)
        .find(|(_, ch)| *ch == '@')
        .map(|(index, _)| index)
    else {
        return false;
    };
    let domain = &value[at + 1..];
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}
