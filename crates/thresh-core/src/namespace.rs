//! Namespace construction for formula evaluation

use crate::collision::NameClasses;
use crate::diagnostic::Diagnostic;
use crate::expr::{Namespace, Value};
use crate::table::ColumnTable;
use indexmap::IndexMap;

/// Reserved key for the nested alias-access object
pub const ALIASES_KEY: &str = "__aliases";

/// The namespace built from the input tables, before any request is applied
#[derive(Debug, Clone, Default)]
pub struct InputNamespace {
    pub namespace: Namespace,
    pub diagnostics: Vec<Diagnostic>,
}

/// Nested `alias -> column -> values` object covering every aliased column
///
/// Unlike the flat namespace this ignores ambiguity, so columns with
/// clashing or unparseable names stay reachable as `__aliases["A"]["name"]`.
pub fn aliases_object(tables: &[ColumnTable]) -> IndexMap<String, Value> {
    let mut object: IndexMap<String, Value> = IndexMap::new();
    for table in tables {
        let Some(alias) = &table.alias else {
            continue;
        };
        let columns = table
            .content
            .iter()
            .map(|(name, values)| (name.clone(), Value::Array(values.clone())))
            .collect();
        object.insert(alias.clone(), Value::Table(columns));
    }
    object
}

/// Build the flat namespace of unambiguous names plus the `__aliases` object
pub fn build_namespace(tables: &[ColumnTable], classes: &NameClasses) -> InputNamespace {
    let mut result = InputNamespace::default();

    let shadowed = classes.is_alias(ALIASES_KEY)
        || classes.is_column(ALIASES_KEY)
        || classes.is_aliased_column(ALIASES_KEY)
        || classes.is_ambiguous(ALIASES_KEY);
    if shadowed {
        result.diagnostics.push(Diagnostic::AliasesShadowed.emit());
    } else {
        result
            .namespace
            .insert(ALIASES_KEY.to_string(), Value::Table(aliases_object(tables)));
    }

    for table in tables {
        for (name, values) in &table.content {
            if classes.is_column(name) && !classes.is_ambiguous(name) {
                result
                    .namespace
                    .entry(name.clone())
                    .or_insert_with(|| Value::Array(values.clone()));
            }

            if let Some(aliased) = table.aliased_name(name) {
                if !classes.is_ambiguous(&aliased) {
                    result
                        .namespace
                        .entry(aliased)
                        .or_insert_with(|| Value::Array(values.clone()));
                }
            }
        }
    }

    tracing::debug!(names = result.namespace.len(), "built input namespace");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::detect_collisions;
    use crate::table::columns;

    fn build(tables: &[ColumnTable]) -> InputNamespace {
        let classes = detect_collisions(tables).unwrap();
        build_namespace(tables, &classes)
    }

    #[test]
    fn test_flat_namespace_has_plain_and_aliased_names() {
        let tables = vec![
            ColumnTable::new(columns(&[("x", &[1.0])])),
            ColumnTable::with_alias(columns(&[("z", &[3.0])]), "B"),
        ];
        let ns = build(&tables).namespace;

        let keys: Vec<&str> = ns.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![ALIASES_KEY, "x", "z", "Bz"]);
        assert_eq!(ns["Bz"], Value::Array(vec![3.0]));
    }

    #[test]
    fn test_ambiguous_names_only_reachable_through_aliases() {
        let tables = vec![
            ColumnTable::with_alias(columns(&[("t", &[1.0])]), "A"),
            ColumnTable::with_alias(columns(&[("t", &[2.0])]), "B"),
        ];
        let ns = build(&tables).namespace;

        assert!(!ns.contains_key("t"));
        assert_eq!(ns["At"], Value::Array(vec![1.0]));
        assert_eq!(ns["Bt"], Value::Array(vec![2.0]));

        let Value::Table(aliases) = &ns[ALIASES_KEY] else {
            panic!("expected the aliases object");
        };
        let Value::Table(b) = &aliases["B"] else {
            panic!("expected a nested table");
        };
        assert_eq!(b["t"], Value::Array(vec![2.0]));
    }

    #[test]
    fn test_aliases_object_skipped_when_column_uses_the_name() {
        let tables = vec![ColumnTable::new(columns(&[(ALIASES_KEY, &[1.0])]))];
        let built = build(&tables);

        assert_eq!(built.diagnostics, vec![Diagnostic::AliasesShadowed]);
        assert_eq!(built.namespace[ALIASES_KEY], Value::Array(vec![1.0]));
    }

    #[test]
    fn test_aliases_object_skipped_when_alias_uses_the_name() {
        let tables = vec![ColumnTable::with_alias(columns(&[("x", &[1.0])]), ALIASES_KEY)];
        let built = build(&tables);

        assert_eq!(built.diagnostics, vec![Diagnostic::AliasesShadowed]);
        assert!(!built.namespace.contains_key(ALIASES_KEY));
    }
}
