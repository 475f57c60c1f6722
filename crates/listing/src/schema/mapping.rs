//! Column mapping and canonical attribute aliases.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Assignment of seller-file columns to marketplace attributes
/// (attribute name -> source column name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingRules {
    columns: IndexMap<String, String>,
}

impl MappingRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `attribute` onto `column`.
    pub fn with(mut self, attribute: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(attribute.into(), column.into());
        self
    }

    /// Source column for an attribute. Blank column names count as unmapped.
    pub fn source_column(&self, attribute: &str) -> Option<&str> {
        self.columns
            .get(attribute)
            .map(|c| c.as_str())
            .filter(|c| !c.is_empty())
    }

    /// Iterate over `(attribute, column)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// Mapped columns that are not among `headers`.
    pub fn unknown_columns<'a>(&'a self, headers: &[String]) -> Vec<&'a str> {
        self.iter()
            .map(|(_, c)| c)
            .filter(|c| !c.is_empty() && !headers.iter().any(|h| h == c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for MappingRules {
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(a, c)| (a.into(), c.into()))
                .collect(),
        }
    }
}

/// Declared synonyms for canonical attributes used by cross-field rules.
///
/// Aliases are tried in order; the first one present in the mapping wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalAliases {
    aliases: IndexMap<String, Vec<String>>,
}

impl CanonicalAliases {
    /// An alias table with no entries.
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    /// Declare the aliases for a canonical attribute.
    pub fn with(mut self, canonical: impl Into<String>, aliases: &[&str]) -> Self {
        self.aliases.insert(
            canonical.into(),
            aliases.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    /// Aliases for a canonical attribute; an undeclared name aliases only itself.
    pub fn aliases_of<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        match self.aliases.get(canonical) {
            Some(list) => list.iter().map(|a| a.as_str()).collect(),
            None => vec![canonical],
        }
    }

    /// Resolve the source column for a canonical attribute through its aliases.
    pub fn resolve<'m>(&self, canonical: &str, mapping: &'m MappingRules) -> Option<&'m str> {
        self.aliases_of(canonical)
            .into_iter()
            .find_map(|alias| mapping.source_column(alias))
    }
}

impl Default for CanonicalAliases {
    fn default() -> Self {
        Self::empty()
            .with("price", &["price", "listingPrice"])
            .with("mrp", &["mrp"])
    }
}
