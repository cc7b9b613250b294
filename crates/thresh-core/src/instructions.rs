//! Command-line instruction parsing
//!
//! The argument stream has up to three stages:
//! 1. gather: files to read, optionally as `alias=path`
//! 2. process: `cat` followed by request tokens
//! 3. postprocess: `print`, `output`, `burst`, `assert`, `list` or `headerlist`

use crate::error::{Error, Result};
use crate::reader::is_stdin;
use std::path::Path;

/// A file to read, with its optional alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub filename: String,
    pub alias: Option<String>,
}

/// What to do with the resolved table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Postprocess {
    /// Write to stdout; the argument is a pseudo-extension such as `.csv`
    Print(String),
    /// Write to a file
    Output(String),
    /// Write each column to its own file under this prefix
    Burst(String),
    /// Evaluate each statement against the final namespace
    Assert(Vec<String>),
    /// Describe the headers of the single gathered file
    List,
    /// Names of the headers of the single gathered file, one per line
    HeaderList,
    Help,
}

impl Default for Postprocess {
    fn default() -> Self {
        Postprocess::Print(".txt".to_string())
    }
}

/// Parsed command-line instructions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instructions {
    pub gather: Vec<Gather>,
    pub process: Vec<String>,
    pub postprocess: Postprocess,
}

impl Instructions {
    fn help() -> Self {
        Self {
            postprocess: Postprocess::Help,
            ..Self::default()
        }
    }

    /// Reject invocations that read standard input more than once
    pub fn check_stdin(&self) -> Result<()> {
        let stdin_count = self
            .gather
            .iter()
            .filter(|g| is_stdin(&g.filename))
            .count();
        if stdin_count > 1 {
            return Err(Error::MultipleStdin);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Gather,
    Cat,
    Assert,
    Output,
    Burst,
    Print,
}

fn is_source(name: &str) -> bool {
    is_stdin(name) || Path::new(name).is_file()
}

/// Parse the positional arguments into instructions
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Instructions> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    if args.is_empty() || args.iter().any(|a| matches!(*a, "-h" | "--help" | "help")) {
        return Ok(Instructions::help());
    }

    let mut instructions = Instructions::default();
    let mut task = Task::Gather;
    let mut remaining = args.into_iter();

    while let Some(arg) = remaining.next() {
        // Stage changes
        match arg {
            "cat" => {
                task = Task::Cat;
                continue;
            }
            "assert" => {
                task = Task::Assert;
                instructions.postprocess = Postprocess::Assert(Vec::new());
                continue;
            }
            "output" => {
                task = Task::Output;
                continue;
            }
            "burst" => {
                task = Task::Burst;
                continue;
            }
            "print" => {
                task = Task::Print;
                continue;
            }
            "list" | "headerlist" => {
                instructions.postprocess = if arg == "list" {
                    Postprocess::List
                } else {
                    Postprocess::HeaderList
                };
                let extra: Vec<&str> = remaining.collect();
                if !extra.is_empty() {
                    return Err(Error::Usage(format!(
                        "unexpected extra arguments: {:?}",
                        extra
                    )));
                }
                return Ok(instructions);
            }
            _ => {}
        }

        match task {
            Task::Gather => instructions.gather.push(parse_gather(arg)?),
            Task::Cat => instructions.process.push(arg.to_string()),
            Task::Assert => {
                if let Postprocess::Assert(statements) = &mut instructions.postprocess {
                    statements.push(arg.to_string());
                }
            }
            Task::Output | Task::Burst | Task::Print => {
                let arg = arg.to_string();
                instructions.postprocess = match task {
                    Task::Output => Postprocess::Output(arg),
                    Task::Burst => Postprocess::Burst(arg),
                    _ => Postprocess::Print(arg),
                };
                let extra: Vec<&str> = remaining.collect();
                if !extra.is_empty() {
                    return Err(Error::Usage(format!(
                        "unexpected extra arguments: {:?}",
                        extra
                    )));
                }
                return Ok(instructions);
            }
        }
    }

    Ok(instructions)
}

fn parse_gather(arg: &str) -> Result<Gather> {
    if is_source(arg) {
        return Ok(Gather {
            filename: arg.to_string(),
            alias: None,
        });
    }

    if let Some((alias, filename)) = arg.split_once('=') {
        if !alias.is_empty() && is_source(filename) {
            return Ok(Gather {
                filename: filename.to_string(),
                alias: Some(alias.to_string()),
            });
        }
    }

    Err(Error::Usage(format!(
        "file not found or alias incorrectly formatted: {}",
        arg
    )))
}
