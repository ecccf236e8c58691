//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("Username is a required field")]
    Empty,
    /// The input string is too short.
    #[error("Username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("Username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A username accepted by the QKart backend for new accounts.
///
/// ## Constraints
///
/// - Length: 6-32 characters
/// - Surrounding whitespace is not trimmed; the backend compares usernames verbatim
///
/// ## Examples
///
/// ```
/// use qkart_core::Username;
///
/// assert!(Username::parse("crio.do").is_ok());
///
/// assert!(Username::parse("").is_err());      // empty
/// assert!(Username::parse("abc").is_err());   // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 6;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, shorter than 6 characters,
    /// or longer than 32 characters.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let len = s.chars().count();

        if len == 0 {
            return Err(UsernameError::Empty);
        }

        if len < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if len > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("criodo").is_ok());
        assert!(Username::parse("crio.do.user").is_ok());
        assert!(Username::parse(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Username::parse(""), Err(UsernameError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            Username::parse("abcde"),
            Err(UsernameError::TooShort { min: 6 })
        );
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            Username::parse(&"a".repeat(33)),
            Err(UsernameError::TooLong { max: 32 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Six two-byte characters
        assert!(Username::parse("éééééé").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UsernameError::Empty.to_string(), "Username is a required field");
        assert_eq!(
            UsernameError::TooShort { min: 6 }.to_string(),
            "Username must be at least 6 characters"
        );
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<Username, _> = serde_json::from_str("\"abc\"");
        assert!(parsed.is_err());

        let parsed: Username = serde_json::from_str("\"criodo\"").unwrap();
        assert_eq!(parsed.as_str(), "criodo");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"criodo\"");
    }
}
