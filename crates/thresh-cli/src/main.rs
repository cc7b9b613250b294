//! thresh CLI
//!
//! Command-line tool for merging, computing and asserting on columns of
//! tabular text files.

use clap::Parser;
use std::io::{IsTerminal, Write};
use thresh_core::{
    header_list, list_headers, parse_args, read_table, render, resolve, run_assertions, burst,
    write_table, ColumnTable, Format, Instructions, Postprocess,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

static THRESH_LOG_ENV_VAR: &str = "THRESH_LOG";

const HELP_TEXT: &str = "\
thresh: merge, compute and assert on columns of tabular text files

USAGE:
    thresh [OPTIONS] <files...> [cat <requests...>] [<postprocess>]

FILES:
    data.txt         whitespace-delimited text; the header may start with '#'
    data.csv         comma-delimited with a header row
    params.json      object of name -> number or array (formulas only)
    -  -.csv         standard input, as text or csv
    A=data.txt       give the file an alias; its columns become 'Ax'

REQUESTS (after 'cat', applied in order):
    A                every column of the file aliased 'A'
    x  Ax            a single column, plain or alias-prefixed
    y=sqrt(x)*2      compute a column from a formula
    y=None           remove a column from the output

POSTPROCESS:
    print [.csv]     write the result to stdout (default, aligned text)
    output <file>    write the result to a file, format from its extension
    burst <prefix>   write each column to <prefix><name>.txt
    assert <expr...> evaluate each expression; exit 1 if any is false
    list             describe the headers of a single file
    headerlist       print the header names of a single file
    help             show this message

OPTIONS:
    -q, --quiet      only log errors
    -v, --verbose    log debug output
    -V, --version    print version

The THRESH_LOG environment variable overrides the log level.
";

#[derive(Parser)]
#[command(name = "thresh")]
#[command(about = "Merge, compute and assert on columns of tabular text files", long_about = None)]
#[command(version, disable_help_flag = true)]
struct Cli {
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Files, requests and postprocessing instructions
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli.args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Install the stderr subscriber; `THRESH_LOG` takes precedence over the flags
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        LevelFilter::ERROR
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(THRESH_LOG_ENV_VAR)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .init();
}

fn run(args: &[String]) -> thresh_core::Result<i32> {
    let instructions = parse_args(args)?;

    if instructions.postprocess == Postprocess::Help {
        print!("{}", HELP_TEXT);
        return Ok(0);
    }

    if instructions.gather.is_empty() {
        tracing::warn!("No files to read in.");
    }
    instructions.check_stdin()?;

    let tables = instructions
        .gather
        .iter()
        .map(|g| read_table(&g.filename, g.alias.as_deref()))
        .collect::<thresh_core::Result<Vec<_>>>()?;

    match &instructions.postprocess {
        Postprocess::List | Postprocess::HeaderList => cmd_list(&instructions, &tables),
        _ => cmd_process(&instructions, &tables),
    }
}

fn cmd_list(instructions: &Instructions, tables: &[ColumnTable]) -> thresh_core::Result<i32> {
    let table = match tables {
        [] => {
            tracing::error!("No file given - nothing to list");
            return Ok(1);
        }
        [table] => table,
        _ => {
            tracing::error!("Can only list one file at a time, got {}.", tables.len());
            return Ok(1);
        }
    };

    let text = if instructions.postprocess == Postprocess::List {
        list_headers(table)
    } else {
        header_list(table)
    };
    print!("{}", text);
    Ok(0)
}

fn cmd_process(instructions: &Instructions, tables: &[ColumnTable]) -> thresh_core::Result<i32> {
    let resolution = resolve(tables, &instructions.process)?;

    match &instructions.postprocess {
        Postprocess::Print(extension) => {
            let text = render(&resolution.output, Format::from_name(extension))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        Postprocess::Output(path) => {
            write_table(&resolution.output, path)?;
            eprintln!("Wrote data to {}", path);
        }
        Postprocess::Burst(prefix) => {
            for path in burst(&resolution.output, prefix)? {
                eprintln!("Wrote data to {}", path.display());
            }
        }
        Postprocess::Assert(statements) => {
            eprintln!("Thresh - Performing assert:");
            let report = run_assertions(&resolution.namespace, statements)?;
            for outcome in &report.outcomes {
                eprintln!("{:?} --> {}", outcome.statement, outcome.value);
                eprintln!(
                    "    Evaluated to {} and {} when converted to a boolean.",
                    outcome.value, outcome.passed
                );
                eprintln!("    Assert {}", if outcome.passed { "PASS" } else { "FAIL" });
            }
            let code = report.exit_code();
            eprintln!("Exiting with return code {}.", code);
            return Ok(code);
        }
        Postprocess::List | Postprocess::HeaderList | Postprocess::Help => {}
    }

    Ok(0)
}
