//! Row rules: per-attribute checks and cross-field checks.

use crate::input::Row;
use crate::schema::{AttributeRule, AttributeSchema, CanonicalAliases, MappingRules, NumberRule, StringRule};

/// Everything a rule may look at while checking one row.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub row: Row<'a>,
    pub mapping: &'a MappingRules,
    pub schema: &'a AttributeSchema,
    pub aliases: &'a CanonicalAliases,
}

/// Trait for row rules.
pub trait RowRule: Send + Sync {
    /// Append an error message for every violation found in the row.
    fn check(&self, ctx: &RowContext<'_>, errors: &mut Vec<String>);
}

/// Checks every schema attribute, in schema order, against its mapped value.
pub struct AttributeChecks;

impl RowRule for AttributeChecks {
    fn check(&self, ctx: &RowContext<'_>, errors: &mut Vec<String>) {
        for (attribute, rule) in ctx.schema.iter() {
            let Some(column) = ctx.mapping.source_column(attribute) else {
                errors.push(format!("Missing mapping for required attribute: {}", attribute));
                continue;
            };

            let Some(value) = ctx.row.value(column) else {
                errors.push(format!(
                    "Attribute '{}' is required but value is empty.",
                    attribute
                ));
                continue;
            };

            match rule {
                AttributeRule::Text(rule) => check_text(attribute, &value.to_string(), rule, errors),
                AttributeRule::Numeric(rule) => match value.as_number() {
                    Some(number) => check_number(attribute, number, rule, errors),
                    None => errors.push(format!("'{}' must be a valid number.", attribute)),
                },
            }
        }
    }
}

fn check_text(attribute: &str, text: &str, rule: &StringRule, errors: &mut Vec<String>) {
    if let Some(max) = rule.max_length {
        if text.chars().count() > max {
            errors.push(format!("'{}' exceeds max length of {}.", attribute, max));
        }
    }

    if let Some(allowed) = &rule.allowed {
        if !allowed.iter().any(|a| a == text) {
            errors.push(format!(
                "'{}' value '{}' is not in allowed values: {}.",
                attribute,
                text,
                format_list(allowed)
            ));
        }
    }
}

fn check_number(attribute: &str, number: f64, rule: &NumberRule, errors: &mut Vec<String>) {
    if rule.integer && number.fract() != 0.0 {
        errors.push(format!("'{}' must be an integer.", attribute));
    }

    if let Some(min) = rule.min {
        if number < min {
            errors.push(format!("'{}' must be >= {}.", attribute, min));
        }
    }
}

/// Render allowed values as `['a', 'b']`.
fn format_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Cross-field rule: the `subject` attribute must not exceed the `bound` attribute.
///
/// Both attributes are resolved through the alias table. The rule only fires
/// when both columns are mapped and both values are numeric; empty or
/// non-numeric values are already reported by [`AttributeChecks`].
pub struct NotGreaterThan {
    pub subject: String,
    pub subject_label: String,
    pub bound: String,
    pub bound_label: String,
}

impl NotGreaterThan {
    /// Selling price must not exceed the maximum retail price.
    pub fn price_within_mrp() -> Self {
        Self {
            subject: "price".to_string(),
            subject_label: "Price".to_string(),
            bound: "mrp".to_string(),
            bound_label: "MRP".to_string(),
        }
    }
}

impl RowRule for NotGreaterThan {
    fn check(&self, ctx: &RowContext<'_>, errors: &mut Vec<String>) {
        let (Some(subject_col), Some(bound_col)) = (
            ctx.aliases.resolve(&self.subject, ctx.mapping),
            ctx.aliases.resolve(&self.bound, ctx.mapping),
        ) else {
            return;
        };

        let (Some(subject), Some(bound)) = (ctx.row.value(subject_col), ctx.row.value(bound_col)) else {
            return;
        };

        if let (Some(s), Some(b)) = (subject.as_number(), bound.as_number()) {
            if s > b {
                errors.push(format!(
                    "{} ({}) cannot be greater than {} ({}).",
                    self.subject_label, subject, self.bound_label, bound
                ));
            }
        }
    }
}
