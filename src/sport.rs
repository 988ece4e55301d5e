// Sport domain types: the closed sport set, wire identifiers, display
// formatting, and the card icon table.
//
// `Sport` is a closed enumeration. Anything outside the set is rejected at
// the parse boundary (`FromStr` / serde), so every function over `Sport`
// itself is total — there is no runtime "unknown sport" branch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SportError {
    #[error("unknown sport: `{0}`")]
    Unknown(String),
}

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// A supported athletic discipline. Serialized as its lowercase identifier
/// on the wire (`"baseball"`, `"tennis"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Baseball,
    Basketball,
    Football,
    Hockey,
    Soccer,
    Tennis,
}

impl Sport {
    /// Every member of the closed sport set, in catalog order.
    pub const ALL: [Sport; 6] = [
        Sport::Baseball,
        Sport::Basketball,
        Sport::Football,
        Sport::Hockey,
        Sport::Soccer,
        Sport::Tennis,
    ];

    /// The lowercase wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Baseball => "baseball",
            Sport::Basketball => "basketball",
            Sport::Football => "football",
            Sport::Hockey => "hockey",
            Sport::Soccer => "soccer",
            Sport::Tennis => "tennis",
        }
    }

    /// Human-readable name: the wire identifier with its first letter
    /// capitalized.
    pub fn display_name(self) -> String {
        capitalize_first(self.as_str())
    }

    /// The glyph shown on the sport's card.
    pub fn icon(self) -> &'static str {
        match self {
            Sport::Baseball => "⚾",
            Sport::Basketball => "🏀",
            Sport::Football => "🏈",
            Sport::Hockey => "🏒",
            Sport::Soccer => "⚽",
            Sport::Tennis => "🎾",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = SportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .iter()
            .find(|sport| sport.as_str() == s)
            .copied()
            .ok_or_else(|| SportError::Unknown(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Capitalize the first character of `name`, leaving the rest untouched.
///
/// Idempotent beyond the first application: applying it to an
/// already-capitalized name is a no-op.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Order-preserving set difference: the sports in `catalog` the user is not
/// subscribed to. Recomputed on every snapshot, never stored.
pub fn available_sports(catalog: &[Sport], subscribed: &[Sport]) -> Vec<Sport> {
    catalog
        .iter()
        .filter(|sport| !subscribed.contains(sport))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
