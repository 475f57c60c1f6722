//! Marketplace attribute schemas and column mappings.

mod attributes;
mod mapping;
mod types;

pub use attributes::AttributeSchema;
pub use mapping::{CanonicalAliases, MappingRules};
pub use types::{AttributeRule, NumberRule, StringRule};
