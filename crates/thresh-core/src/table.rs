//! Core table types for representing columnar data

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping of column name to values
pub type Columns = IndexMap<String, Vec<f64>>;

/// A set of named numeric columns read from a single source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTable {
    /// Columns in file order
    pub content: Columns,
    /// Short tag identifying the source, unique per invocation
    pub alias: Option<String>,
    /// Columns are visible to formulas but skipped by default expansion
    #[serde(default)]
    pub namespace_only: bool,
}

impl ColumnTable {
    /// Create a table with no alias
    pub fn new(content: Columns) -> Self {
        Self {
            content,
            alias: None,
            namespace_only: false,
        }
    }

    /// Create a table tagged with an alias
    pub fn with_alias(content: Columns, alias: impl Into<String>) -> Self {
        Self {
            content,
            alias: Some(alias.into()),
            namespace_only: false,
        }
    }

    /// Builder-style setter for the namespace-only flag
    pub fn namespace_only(mut self, namespace_only: bool) -> Self {
        self.namespace_only = namespace_only;
        self
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.content.len()
    }

    /// Length of the longest column
    pub fn row_count(&self) -> usize {
        self.content.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterate over column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    /// The aliased form of a column name, if this table has an alias
    pub fn aliased_name(&self, column: &str) -> Option<String> {
        self.alias.as_ref().map(|alias| format!("{}{}", alias, column))
    }
}

#[cfg(test)]
pub(crate) fn columns(pairs: &[(&str, &[f64])]) -> Columns {
    pairs
        .iter()
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_uses_longest_column() {
        let table = ColumnTable::new(columns(&[("a", &[1.0, 2.0]), ("b", &[1.0, 2.0, 3.0])]));
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_aliased_name() {
        let plain = ColumnTable::new(columns(&[("x", &[1.0])]));
        let aliased = ColumnTable::with_alias(columns(&[("x", &[1.0])]), "A");

        assert_eq!(plain.aliased_name("x"), None);
        assert_eq!(aliased.aliased_name("x"), Some("Ax".to_string()));
    }

    #[test]
    fn test_names_preserve_order() {
        let table = ColumnTable::new(columns(&[("z", &[]), ("a", &[]), ("m", &[])]));
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
