use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog item identifier. Snapshots use numbers or strings; the original
/// form is preserved when echoed back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId::Number(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_original_form() {
        let num: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(num, ItemId::Number(42));
        assert_eq!(serde_json::to_string(&num).unwrap(), "42");

        let text: ItemId = serde_json::from_str("\"sku-7\"").unwrap();
        assert_eq!(text, ItemId::Text("sku-7".into()));
        assert_eq!(text.to_string(), "sku-7");
    }
}
