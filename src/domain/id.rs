//! Domain identifier types with proper encapsulation.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tradable item identifier - newtype for type safety.
///
/// Unique within a session. The inner String is private to ensure all
/// construction goes through the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new `ItemId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the item ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&String> for ItemId {
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_displays_inner_value() {
        let id = ItemId::new("Alice_Bike");
        assert_eq!(id.to_string(), "Alice_Bike");
        assert_eq!(id.as_str(), "Alice_Bike");
    }

    #[test]
    fn item_id_serializes_as_plain_string() {
        let id = ItemId::from("Bob_Laptop");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Bob_Laptop\"");
    }
}
