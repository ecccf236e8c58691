//! Product rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    /// The value is above the maximum of five stars.
    #[error("rating must be between 0 and {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: u8,
        /// Maximum allowed value.
        max: u8,
    },
}

/// An aggregate product rating, an integer number of stars out of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Highest possible rating.
    pub const MAX: u8 = 5;

    /// Create a rating, rejecting values above [`Rating::MAX`].
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` if `value > 5`.
    pub const fn new(value: u8) -> Result<Self, RatingError> {
        if value > Self::MAX {
            return Err(RatingError::OutOfRange {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Create a rating, clamping `value` into `0..=5`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_lossless)]
    pub const fn saturating(value: i64) -> Self {
        if value <= 0 {
            Self(0)
        } else if value >= Self::MAX as i64 {
            Self(Self::MAX)
        } else {
            Self(value as u8)
        }
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Rating::new(0).unwrap().stars(), 0);
        assert_eq!(Rating::new(5).unwrap().stars(), 5);
        assert_eq!(
            Rating::new(6),
            Err(RatingError::OutOfRange { value: 6, max: 5 })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Rating::new(4).unwrap().to_string(), "4/5");
    }

    #[test]
    fn test_saturating() {
        assert_eq!(Rating::saturating(-3).stars(), 0);
        assert_eq!(Rating::saturating(3).stars(), 3);
        assert_eq!(Rating::saturating(9).stars(), 5);
        assert_eq!(Rating::saturating(i64::MAX).stars(), 5);
    }

    #[test]
    fn test_deserialize_validates() {
        let rating: Rating = serde_json::from_str("3").unwrap();
        assert_eq!(rating.stars(), 3);
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}
