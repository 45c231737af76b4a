//! Color record model

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

const MAX_COLOR_VALUE: u32 = 0x00FF_FFFF;

/// Identifier of a stored color, assigned by the local store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(i64);

impl ColorId {
    /// Wrap a raw row id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw row id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColorId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A color as persisted in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRecord {
    /// Store-assigned identifier
    pub id: ColorId,
    /// Hex color value (`#RRGGBB`)
    pub color_code: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Whether the remote store has confirmed this record
    pub synced: bool,
}

/// A color waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColor {
    /// Explicit key, or `None` to let the store generate one
    pub id: Option<ColorId>,
    /// Hex color value (`#RRGGBB`)
    pub color_code: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl NewColor {
    /// Create a new color with a store-generated id
    #[must_use]
    pub fn new(color_code: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: None,
            color_code: color_code.into(),
            created_at,
        }
    }

    /// Create a random color stamped with the current time
    #[must_use]
    pub fn random() -> Self {
        Self::new(random_color_code(), crate::util::unix_millis_now())
    }

    /// Use an explicit key instead of a generated one
    #[must_use]
    pub const fn with_id(mut self, id: ColorId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Generate a uniformly random `#RRGGBB` color code
#[must_use]
pub fn random_color_code() -> String {
    let value = rand::thread_rng().gen_range(0..=MAX_COLOR_VALUE);
    format!("#{value:06X}")
}

/// Check that a value is `#` followed by exactly six hex digits
///
/// # Examples
///
/// ```
/// use colorcodex_core::models::is_valid_color_code;
///
/// assert!(is_valid_color_code("#A1B2C3"));
/// assert!(!is_valid_color_code("A1B2C3"));
/// ```
#[must_use]
pub fn is_valid_color_code(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
