//! Column resolution engine
//!
//! Turns an ordered list of request tokens into a merged output table. Each
//! token is an alias (every column of that file), a column name, an
//! alias-prefixed column name, or a `name=expression` formula. Tokens are
//! applied strictly in order and every formula sees the output built so far.

use crate::collision::{detect_collisions, NameClasses};
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::expr::{self, FormulaResult, Namespace, Value};
use crate::namespace::build_namespace;
use crate::table::{ColumnTable, Columns};

/// Outcome of a successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The merged and computed columns, in the order they were produced
    pub output: ColumnTable,
    /// Input namespace overlaid with the output, for assertions
    pub namespace: Namespace,
    /// Warnings raised along the way, in order
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve `requests` against `tables`
///
/// An empty request list stands for every unambiguous column of every table
/// that isn't namespace-only.
#[tracing::instrument(skip_all, fields(tables = tables.len(), requests = requests.len()))]
pub fn resolve<S: AsRef<str>>(tables: &[ColumnTable], requests: &[S]) -> Result<Resolution> {
    let classes = detect_collisions(tables)?;
    let input = build_namespace(tables, &classes);

    let requests: Vec<String> = if requests.is_empty() {
        default_requests(tables, &classes)
    } else {
        requests.iter().map(|r| r.as_ref().to_string()).collect()
    };

    let mut resolver = Resolver {
        tables,
        classes,
        input: input.namespace,
        output: Columns::new(),
        diagnostics: input.diagnostics,
    };
    for request in &requests {
        resolver.apply(request)?;
    }

    Ok(resolver.finish())
}

/// The implicit request list: every unambiguous column in table order
pub fn default_requests(tables: &[ColumnTable], classes: &NameClasses) -> Vec<String> {
    let mut requests = Vec::new();
    for table in tables.iter().filter(|t| !t.namespace_only) {
        for name in table.content.keys() {
            if classes.is_unique(name) {
                requests.push(name.clone());
                continue;
            }
            // Only fall back to the prefixed form; requesting both would
            // clobber the column with itself.
            if let Some(aliased) = table.aliased_name(name) {
                if classes.is_unique(&aliased) {
                    requests.push(aliased);
                }
            }
        }
    }
    requests
}

struct Resolver<'a> {
    tables: &'a [ColumnTable],
    classes: NameClasses,
    input: Namespace,
    output: Columns,
    diagnostics: Vec<Diagnostic>,
}

impl Resolver<'_> {
    fn apply(&mut self, request: &str) -> Result<()> {
        if self.classes.is_ambiguous(request) {
            return Err(Error::AmbiguousRequest(request.to_string()));
        }

        if self.classes.is_alias(request) {
            tracing::debug!(alias = request, "adding every column of aliased file");
            let tables = self.tables;
            if let Some(table) = tables.iter().find(|t| t.alias.as_deref() == Some(request)) {
                for (name, values) in &table.content {
                    self.insert(name, values.clone());
                }
            }
            return Ok(());
        }

        if self.classes.is_column(request) {
            let tables = self.tables;
            if let Some(values) = tables.iter().find_map(|t| t.content.get(request)) {
                self.insert(request, values.clone());
            }
            return Ok(());
        }

        if let Some((index, name)) = self.classes.aliased_source(request) {
            let values = self.tables[index].content[name].clone();
            let name = name.to_string();
            self.insert(&name, values);
            return Ok(());
        }

        if request.contains('=') {
            return self.apply_formula(request);
        }

        Err(Error::UnresolvedReference(request.to_string()))
    }

    fn apply_formula(&mut self, token: &str) -> Result<()> {
        let (head, expression) = token
            .split_once('=')
            .map(|(h, e)| (h.trim(), e.trim()))
            .unwrap_or((token.trim(), ""));
        if head.is_empty() {
            return Err(Error::MalformedFormula {
                token: token.to_string(),
                reason: "no column label given".to_string(),
            });
        }
        if expression.is_empty() {
            return Err(Error::MalformedFormula {
                token: token.to_string(),
                reason: "no eval string given".to_string(),
            });
        }

        let value = expr::evaluate(&self.current_namespace(), expression)?;
        let result = FormulaResult::try_from(value).map_err(|source| Error::Eval {
            expression: expression.to_string(),
            source,
        })?;

        match result {
            FormulaResult::Deleted => {
                if self.output.shift_remove(head).is_none() {
                    return Err(Error::ColumnNotFound(head.to_string()));
                }
                self.diagnostics.push(Diagnostic::Removed(head.to_string()).emit());
            }
            FormulaResult::Assign(values) => self.insert(head, values),
        }
        Ok(())
    }

    /// Insert a column, warning when an existing one is overwritten
    fn insert(&mut self, name: &str, values: Vec<f64>) {
        if self.output.contains_key(name) {
            self.diagnostics.push(Diagnostic::Clobber(name.to_string()).emit());
        }
        self.output.insert(name.to_string(), values);
    }

    /// Input namespace with the output so far layered on top
    fn current_namespace(&self) -> Namespace {
        let mut namespace = self.input.clone();
        for (name, values) in &self.output {
            namespace.insert(name.clone(), Value::Array(values.clone()));
        }
        namespace
    }

    fn finish(self) -> Resolution {
        let namespace = self.current_namespace();
        Resolution {
            output: ColumnTable::new(self.output),
            namespace,
            diagnostics: self.diagnostics,
        }
    }
}
