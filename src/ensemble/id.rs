use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An opaque, globally unique identifier token.
///
/// Internally string-backed so that callers can hand in identifiers minted
/// elsewhere (user ids, resource ids) while this crate mints its own with
/// [`Id::fresh`]. Collisions between fresh ids are treated as impossible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Mint a new unique identifier.
    pub fn fresh() -> Self {
        Id(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}
