//! thresh-core: Core library for merging numeric column tables
//!
//! This library provides functionality to:
//! - Read whitespace, CSV and JSON files into column tables
//! - Classify names across tables as aliases, columns, aliased columns or ambiguous
//! - Resolve request tokens (aliases, columns, formulas) into a merged table
//! - Evaluate formulas in a restricted, numpy-flavoured expression language
//! - Write the merged table back out and run assertions against it

pub mod assertion;
pub mod collision;
pub mod diagnostic;
pub mod error;
pub mod expr;
pub mod instructions;
pub mod namespace;
pub mod reader;
pub mod resolver;
pub mod table;
pub mod writer;

pub use assertion::{run_assertions, AssertOutcome, AssertReport};
pub use collision::{detect_collisions, NameClasses};
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use expr::{evaluate, EvalError, FormulaResult, Namespace, Value};
pub use instructions::{parse_args, Gather, Instructions, Postprocess};
pub use namespace::{build_namespace, InputNamespace, ALIASES_KEY};
pub use reader::{read_table, read_table_str, Format};
pub use resolver::{resolve, Resolution};
pub use table::{ColumnTable, Columns};
pub use writer::{burst, header_list, list_headers, render, to_csv, to_json, to_text, write_table};
