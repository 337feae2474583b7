use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use def_transform::models::Definition;
use def_transform::processor::{self, RunOptions};
use def_transform::transformations::{
    AppendName, Noop, RecordName, RemoveField, RenameField, SetField, Transformation,
};

/// def-transform — apply one in-place transformer to named JSON definitions
#[derive(Parser, Debug)]
#[command(
    name = "def-transform",
    version,
    about = "Transforms every named definition in JSON files",
    long_about = "Applies a single transformer to each named definition of one or more JSON files.\n\
                  A file holds definitions either as top-level members or under a \"definitions\" key.\n\
                  Directories are searched recursively and files are processed in parallel."
)]
struct Cli {
    /// Path to a JSON file or a directory containing JSON files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (default: rewrite each input file in place)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Only transform the named definition (repeatable)
    #[arg(short = 'd', long = "definition", value_name = "NAME")]
    definitions: Vec<String>,

    /// Print results to stdout instead of writing files; with several files
    /// each document is preceded by a `// FILE: <path>` line
    #[arg(short = 's', long = "stdout")]
    stdout: bool,

    /// Print debug information
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Write log lines to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Leave definitions unchanged (normalizes formatting)
    Noop,
    /// Set FIELD to VALUE (parsed as JSON, otherwise taken as a string)
    Set { field: String, value: String },
    /// Store each definition's name in FIELD
    RecordName { field: String },
    /// Append each definition's name to the list in FIELD
    AppendName { field: String },
    /// Remove FIELD
    Remove { field: String },
    /// Rename field FROM to TO
    Rename { from: String, to: String },
}

impl Command {
    fn into_transformer(self, verbose: bool) -> Box<dyn Transformation<Definition> + Send + Sync> {
        match self {
            Command::Noop => Box::new(Noop),
            Command::Set { field, value } => Box::new(SetField {
                field,
                value: parse_value(&value),
                verbose,
            }),
            Command::RecordName { field } => Box::new(RecordName { field, verbose }),
            Command::AppendName { field } => Box::new(AppendName { field, verbose }),
            Command::Remove { field } => Box::new(RemoveField { field, verbose }),
            Command::Rename { from, to } => Box::new(RenameField { from, to, verbose }),
        }
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.output.is_some() && cli.stdout {
        anyhow::bail!("--output and --stdout cannot be used together");
    }

    if let Command::Rename { from, to } = &cli.command {
        if from == to {
            anyhow::bail!("rename: FROM and TO must differ");
        }
    }

    if let Some(path) = &cli.log_file {
        def_transform::logger::set_log_file(path)?;
    }

    let options = RunOptions {
        output_dir: cli.output,
        only: cli.definitions,
        stdout: cli.stdout,
        verbose: cli.verbose,
    };
    let transformer = cli.command.into_transformer(cli.verbose);

    processor::run(&cli.input, &*transformer, &options)
}
