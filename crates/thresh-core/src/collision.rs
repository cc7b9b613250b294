//! Naming collision detection across input tables
//!
//! Every input table contributes names to three pools: its alias, its plain
//! column names, and (when aliased) the alias-prefixed column names. A name
//! that lands in the pools more than once can't be resolved to a single
//! source and is recorded as ambiguous.

use crate::error::{Error, Result};
use crate::table::ColumnTable;
use std::collections::{HashMap, HashSet};

/// Classification of every requestable name across a set of tables
#[derive(Debug, Clone, Default)]
pub struct NameClasses {
    /// All aliases, one per aliased table
    pub aliases: HashSet<String>,
    /// All plain column names seen
    pub column_names: HashSet<String>,
    /// All `alias + column` concatenations seen
    pub aliased_column_names: HashSet<String>,
    /// Names that collide with another alias, column or aliased column
    pub ambiguous_requests: HashSet<String>,
    /// Aliased name -> (table index, column name) of its first definition
    aliased_sources: HashMap<String, (usize, String)>,
}

impl NameClasses {
    /// Whether a request for `name` must be refused
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous_requests.contains(name)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains(name)
    }

    pub fn is_column(&self, name: &str) -> bool {
        self.column_names.contains(name)
    }

    pub fn is_aliased_column(&self, name: &str) -> bool {
        self.aliased_column_names.contains(name)
    }

    /// A plain or aliased name that resolves to exactly one column
    pub fn is_unique(&self, name: &str) -> bool {
        !self.is_ambiguous(name) && (self.is_column(name) || self.is_aliased_column(name))
    }

    /// Table index and unprefixed column name behind an aliased column name
    pub fn aliased_source(&self, name: &str) -> Option<(usize, &str)> {
        self.aliased_sources
            .get(name)
            .map(|(index, column)| (*index, column.as_str()))
    }

    fn seen(&self, name: &str) -> bool {
        self.is_alias(name) || self.is_column(name) || self.is_aliased_column(name)
    }
}

/// Classify all names across `tables`, failing on repeated aliases
pub fn detect_collisions(tables: &[ColumnTable]) -> Result<NameClasses> {
    let mut classes = NameClasses::default();

    // Aliases are collected up front so columns named like a later alias
    // are still caught.
    for alias in tables.iter().filter_map(|t| t.alias.as_ref()) {
        if !classes.aliases.insert(alias.clone()) {
            return Err(Error::DuplicateAlias(alias.clone()));
        }
    }

    for (index, table) in tables.iter().enumerate() {
        for column in table.content.keys() {
            if classes.seen(column) {
                classes.ambiguous_requests.insert(column.clone());
            }
            classes.column_names.insert(column.clone());

            let Some(aliased) = table.aliased_name(column) else {
                continue;
            };
            if classes.seen(&aliased) {
                classes.ambiguous_requests.insert(aliased.clone());
            }
            classes
                .aliased_sources
                .entry(aliased.clone())
                .or_insert_with(|| (index, column.clone()));
            classes.aliased_column_names.insert(aliased);
        }
    }

    Ok(classes)
}
