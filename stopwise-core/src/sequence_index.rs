//! Validated 1-based sequence indices.
//!
//! Indices are persisted into a 32-bit signed integer column, so values are
//! bounded by [`MAX_SEQUENCE_INDEX`]. Every conversion from untrusted numeric
//! input goes through the checks in this module before it can reach storage.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use thiserror::Error;

/// Largest index representable by the storage column (`i32::MAX`).
pub const MAX_SEQUENCE_INDEX: u32 = 0x7fff_ffff;

/// A stop's 1-based position within its route.
///
/// # Examples
/// ```
/// use stopwise_core::SequenceIndex;
///
/// # fn main() -> Result<(), stopwise_core::SequenceIndexError> {
/// let first = SequenceIndex::from_position(0)?;
/// assert_eq!(first.get(), 1);
/// assert_eq!(first.position(), 0);
///
/// let parsed: SequenceIndex = "3".parse()?;
/// assert_eq!(parsed.get(), 3);
/// assert!(SequenceIndex::try_from(2.5_f64).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct SequenceIndex(NonZeroU32);

/// Errors raised when coercing a value into a [`SequenceIndex`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceIndexError {
    /// Zero or a negative value was supplied.
    #[error("sequence index must be positive, got {value}")]
    NonPositive {
        /// The rejected value.
        value: i128,
    },
    /// The value does not fit the storage column.
    #[error("sequence index {value} exceeds the storage limit of {MAX_SEQUENCE_INDEX}")]
    OutOfRange {
        /// The rejected value.
        value: i128,
    },
    /// A floating-point value had a fractional part.
    #[error("sequence index must be an integer, got {value}")]
    Fractional {
        /// The rejected value.
        value: f64,
    },
    /// A floating-point value was NaN or infinite.
    #[error("sequence index must be finite")]
    NonFinite,
    /// A string did not contain a number.
    #[error("sequence index {value:?} is not a number")]
    NotNumeric {
        /// The rejected input.
        value: String,
    },
}

impl SequenceIndex {
    /// The first position in a route.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Construct an index from its 1-based value.
    pub fn new(value: u32) -> Result<Self, SequenceIndexError> {
        Self::from_wide(i128::from(value))
    }

    /// Construct the index for a 0-based list position.
    pub fn from_position(position: usize) -> Result<Self, SequenceIndexError> {
        let value = i128::try_from(position)
            .ok()
            .and_then(|p| p.checked_add(1))
            .ok_or(SequenceIndexError::OutOfRange { value: i128::MAX })?;
        Self::from_wide(value)
    }

    /// The 1-based value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The 0-based list position this index denotes.
    #[must_use]
    pub fn position(self) -> usize {
        usize::try_from(self.0.get().saturating_sub(1)).unwrap_or(usize::MAX)
    }

    fn from_wide(value: i128) -> Result<Self, SequenceIndexError> {
        if value <= 0 {
            return Err(SequenceIndexError::NonPositive { value });
        }
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_SEQUENCE_INDEX)
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(SequenceIndexError::OutOfRange { value })
    }
}

impl fmt::Display for SequenceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SequenceIndex> for i64 {
    fn from(index: SequenceIndex) -> Self {
        Self::from(index.get())
    }
}

impl TryFrom<i64> for SequenceIndex {
    type Error = SequenceIndexError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_wide(i128::from(value))
    }
}

impl TryFrom<u64> for SequenceIndex {
    type Error = SequenceIndexError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_wide(i128::from(value))
    }
}

impl TryFrom<f64> for SequenceIndex {
    type Error = SequenceIndexError;

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the value is finite and integral; `as` saturates and the range is checked"
    )]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(SequenceIndexError::NonFinite);
        }
        if value.fract() != 0.0 {
            return Err(SequenceIndexError::Fractional { value });
        }
        Self::from_wide(value as i128)
    }
}

impl FromStr for SequenceIndex {
    type Err = SequenceIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i128>() {
            return Self::from_wide(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::try_from(value),
            Err(_) => Err(SequenceIndexError::NotNumeric {
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SequenceIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Upstream records have carried indices as integers, floats and
        // strings; all of them are coerced through the same checks.
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RawIndex {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        let parsed = match RawIndex::deserialize(deserializer)? {
            RawIndex::Integer(value) => Self::try_from(value),
            RawIndex::Float(value) => Self::try_from(value),
            RawIndex::Text(value) => value.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
