//! Product identifiers.
//!
//! The product API hands out numeric ids while the generated sample catalog
//! uses string ids like `mock-7`. [`ProductId`] accepts both and serializes
//! each back in the form it was read, so stored carts round-trip unchanged.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product identifier, numeric or textual.
///
/// # Example
///
/// ```rust
/// # use zapkart_core::ProductId;
/// let api: ProductId = serde_json::from_str("42").unwrap();
/// let sample: ProductId = serde_json::from_str("\"mock-3\"").unwrap();
///
/// assert_eq!(api, ProductId::from(42));
/// assert_eq!(sample.to_string(), "mock-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Id assigned by the product API.
    Numeric(i64),
    /// Free-form id (sample catalog, third-party feeds).
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Numeric(i64::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_are_distinct() {
        // "1" from a string feed is not the same product as API id 1
        assert_ne!(ProductId::from(1), ProductId::from("1"));
    }

    #[test]
    fn test_id_keeps_its_json_form() {
        let numeric: ProductId = serde_json::from_str("17").unwrap();
        let text: ProductId = serde_json::from_str("\"mock-17\"").unwrap();

        assert_eq!(serde_json::to_string(&numeric).unwrap(), "17");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"mock-17\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::from(5).to_string(), "5");
        assert_eq!(ProductId::from("mock-5").to_string(), "mock-5");
    }
}
