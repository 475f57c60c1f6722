//! Row validator: runs every row rule against a single row.

use crate::input::Row;
use crate::schema::{AttributeSchema, CanonicalAliases, MappingRules};

use super::rules::{AttributeChecks, NotGreaterThan, RowContext, RowRule};

/// Composite validator that runs all row rules in order.
///
/// Attribute checks come first (in schema order), cross-field rules last.
/// No rule short-circuits another.
pub struct RowValidator {
    rules: Vec<Box<dyn RowRule>>,
    aliases: CanonicalAliases,
}

impl RowValidator {
    /// Create a row validator with the default rules and alias table.
    pub fn new() -> Self {
        Self::with_aliases(CanonicalAliases::default())
    }

    /// Create a row validator with the default rules and a custom alias table.
    pub fn with_aliases(aliases: CanonicalAliases) -> Self {
        Self {
            rules: vec![
                Box::new(AttributeChecks),
                Box::new(NotGreaterThan::price_within_mrp()),
            ],
            aliases,
        }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: impl RowRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Validate one row, returning its errors in rule order.
    pub fn validate(&self, row: Row<'_>, mapping: &MappingRules, schema: &AttributeSchema) -> Vec<String> {
        let ctx = RowContext {
            row,
            mapping,
            schema,
            aliases: &self.aliases,
        };

        let mut errors = Vec::new();
        for rule in &self.rules {
            rule.check(&ctx, &mut errors);
        }
        errors
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate one row with the default rules.
pub fn validate_row(row: Row<'_>, mapping: &MappingRules, schema: &AttributeSchema) -> Vec<String> {
    RowValidator::new().validate(row, mapping, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DataTable;
    use crate::schema::AttributeRule;

    fn product_schema() -> AttributeSchema {
        AttributeSchema::new()
            .with_attribute("title", AttributeRule::string())
            .with_attribute("mrp", AttributeRule::number())
            .with_attribute("price", AttributeRule::number())
            .with_attribute("color", AttributeRule::string())
    }

    fn product_mapping() -> MappingRules {
        MappingRules::new()
            .with("title", "Item")
            .with("mrp", "Cost")
            .with("price", "Retail")
            .with("color", "Hue")
    }

    #[test]
    fn test_valid_row() {
        let table = DataTable::from_text(&["Item", "Cost", "Retail", "Hue"], &[&["Val1", "500", "400", "Red"]]);
        let errors = validate_row(table.row(0).unwrap(), &product_mapping(), &product_schema());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_price_above_mrp() {
        let table = DataTable::from_text(&["Item", "Cost", "Retail", "Hue"], &[&["Inv1", "200", "300", "Blue"]]);
        let errors = validate_row(table.row(0).unwrap(), &product_mapping(), &product_schema());
        assert_eq!(errors, vec!["Price (300) cannot be greater than MRP (200)."]);
    }

    #[test]
    fn test_every_attribute_checked_in_schema_order() {
        let table = DataTable::from_text(&["Item", "Cost", "Retail", "Hue"], &[&["", "abc", "x", ""]]);
        let mapping = MappingRules::new()
            .with("mrp", "Cost")
            .with("price", "Retail")
            .with("color", "Hue");
        let errors = validate_row(table.row(0).unwrap(), &mapping, &product_schema());

        assert_eq!(
            errors,
            vec![
                "Missing mapping for required attribute: title",
                "'mrp' must be a valid number.",
                "'price' must be a valid number.",
                "Attribute 'color' is required but value is empty.",
            ]
        );
    }

    #[test]
    fn test_cross_field_error_comes_last() {
        let table = DataTable::from_text(&["Item", "Cost", "Retail", "Hue"], &[&["Inv1", "200", "300", ""]]);
        let errors = validate_row(table.row(0).unwrap(), &product_mapping(), &product_schema());

        assert_eq!(
            errors,
            vec![
                "Attribute 'color' is required but value is empty.",
                "Price (300) cannot be greater than MRP (200).",
            ]
        );
    }

    #[test]
    fn test_mapped_column_absent_from_file_is_empty() {
        let table = DataTable::from_text(&["Item"], &[&["Shirt"]]);
        let schema = AttributeSchema::new()
            .with_attribute("title", AttributeRule::string())
            .with_attribute("brand", AttributeRule::string());
        let mapping = MappingRules::new().with("title", "Item").with("brand", "Brand");

        let errors = validate_row(table.row(0).unwrap(), &mapping, &schema);
        assert_eq!(errors, vec!["Attribute 'brand' is required but value is empty."]);
    }

    #[test]
    fn test_custom_aliases() {
        let table = DataTable::from_text(&["Sale", "List"], &[&["90", "80"]]);
        let schema = AttributeSchema::new();
        let mapping = MappingRules::new().with("offerPrice", "Sale").with("mrp", "List");

        assert!(RowValidator::new().validate(table.row(0).unwrap(), &mapping, &schema).is_empty());

        let aliases = CanonicalAliases::default().with("price", &["price", "listingPrice", "offerPrice"]);
        let errors = RowValidator::with_aliases(aliases).validate(table.row(0).unwrap(), &mapping, &schema);
        assert_eq!(errors, vec!["Price (90) cannot be greater than MRP (80)."]);
    }
}
