//! Rule types for marketplace attributes.

use serde::{Deserialize, Serialize};

/// Constraints for a text attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringRule {
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Allowed values, compared against the raw cell text.
    pub allowed: Option<Vec<String>>,
}

/// Constraints for a numeric attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRule {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Whether the value must be integral.
    pub integer: bool,
}

/// Validation rule for a single attribute.
///
/// On the wire this is `{"type": "string" | "number" | "integer", ...}` with
/// `type` defaulting to `"string"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum AttributeRule {
    Text(StringRule),
    Numeric(NumberRule),
}

impl AttributeRule {
    /// A string rule with no constraints.
    pub fn string() -> Self {
        AttributeRule::Text(StringRule::default())
    }

    /// A number rule with no constraints.
    pub fn number() -> Self {
        AttributeRule::Numeric(NumberRule::default())
    }

    /// An integer rule with no constraints.
    pub fn integer() -> Self {
        AttributeRule::Numeric(NumberRule {
            min: None,
            integer: true,
        })
    }

    /// Set the maximum length (string rules only).
    pub fn with_max_length(mut self, max: usize) -> Self {
        if let AttributeRule::Text(rule) = &mut self {
            rule.max_length = Some(max);
        }
        self
    }

    /// Set the allowed values (string rules only).
    pub fn with_allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let AttributeRule::Text(rule) = &mut self {
            rule.allowed = Some(values.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Set the lower bound (numeric rules only).
    pub fn with_min(mut self, min: f64) -> Self {
        if let AttributeRule::Numeric(rule) = &mut self {
            rule.min = Some(min);
        }
        self
    }

    /// Wire name of the rule type.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeRule::Text(_) => "string",
            AttributeRule::Numeric(NumberRule { integer: true, .. }) => "integer",
            AttributeRule::Numeric(_) => "number",
        }
    }
}

/// Untyped wire form of a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRule {
    #[serde(rename = "type", default = "default_type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_min")]
    min: Option<f64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<String>>,
}

fn default_type() -> String {
    "string".to_string()
}

/// Write whole-number bounds as JSON integers (`0`, not `0.0`).
fn serialize_min<S: serde::Serializer>(min: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *min {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => serializer.serialize_some(&(v as i64)),
        other => other.serialize(serializer),
    }
}

impl TryFrom<RawRule> for AttributeRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "string" => {
                if raw.min.is_some() {
                    return Err("'min' does not apply to type 'string'".to_string());
                }
                // Zero length and an empty enum leave the value unconstrained.
                Ok(AttributeRule::Text(StringRule {
                    max_length: raw.max_length.filter(|&n| n > 0),
                    allowed: raw.allowed.filter(|v| !v.is_empty()),
                }))
            }
            "number" | "integer" => {
                if raw.max_length.is_some() || raw.allowed.is_some() {
                    return Err(format!(
                        "'max_length' and 'enum' do not apply to type '{}'",
                        raw.kind
                    ));
                }
                Ok(AttributeRule::Numeric(NumberRule {
                    min: raw.min,
                    integer: raw.kind == "integer",
                }))
            }
            other => Err(format!(
                "unknown attribute type '{}' (expected string, number or integer)",
                other
            )),
        }
    }
}

impl From<AttributeRule> for RawRule {
    fn from(rule: AttributeRule) -> Self {
        let kind = rule.type_name().to_string();
        match rule {
            AttributeRule::Text(r) => RawRule {
                kind,
                max_length: r.max_length,
                min: None,
                allowed: r.allowed,
            },
            AttributeRule::Numeric(r) => RawRule {
                kind,
                max_length: None,
                min: r.min,
                allowed: None,
            },
        }
    }
}
