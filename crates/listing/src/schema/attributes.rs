//! Attribute schema: the ordered rule set a marketplace template requires.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ListingError, Result};

use super::types::AttributeRule;

/// Ordered map of attribute name to rule. Every attribute is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSchema {
    attributes: IndexMap<String, AttributeRule>,
}

impl AttributeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ListingError::Schema(e.to_string()))
    }

    /// Convert an already-decoded JSON value into a schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ListingError::Schema(e.to_string()))
    }

    /// Add an attribute, keeping insertion order.
    pub fn with_attribute(mut self, name: impl Into<String>, rule: AttributeRule) -> Self {
        self.attributes.insert(name.into(), rule);
        self
    }

    /// Get the rule for an attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeRule> {
        self.attributes.get(name)
    }

    /// Iterate over `(attribute, rule)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRule)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attribute names in schema order.
    pub fn names(&self) -> Vec<&str> {
        self.attributes.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_order() {
        let schema = AttributeSchema::from_json(
            r#"{
                "productName": {"type": "string", "max_length": 150},
                "brand": {"type": "string"},
                "price": {"type": "number"},
                "mrp": {"type": "number"}
            }"#,
        )
        .unwrap();

        assert_eq!(schema.names(), vec!["productName", "brand", "price", "mrp"]);
        assert_eq!(schema.get("price"), Some(&AttributeRule::number()));
    }

    #[test]
    fn test_invalid_schema_is_schema_error() {
        let err = AttributeSchema::from_json(r#"{"size": {"type": "color"}}"#).unwrap_err();
        assert!(matches!(err, ListingError::Schema(_)));

        let err = AttributeSchema::from_json(r#"["not", "a", "map"]"#).unwrap_err();
        assert!(matches!(err, ListingError::Schema(_)));
    }

    #[test]
    fn test_builder() {
        let schema = AttributeSchema::new()
            .with_attribute("title", AttributeRule::string())
            .with_attribute("stock", AttributeRule::integer().with_min(0.0));

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("stock").map(|r| r.type_name()), Some("integer"));
    }
}
