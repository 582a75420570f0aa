//! `shape` - DDL and JSON validation from YAML schema files
//!
//! ```bash
//! shape --schema schema.yaml ddl
//! shape --schema schema.yaml validate message input.json
//! cat input.json | shape validate message
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use shape_core::{Descriptor, Report, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

mod config;
mod logging;
mod schema_file;

use config::Config;
use schema_file::SchemaFile;

#[derive(Debug, Parser)]
#[command(name = "shape", version, about = "Typed schema descriptors: SQLite DDL and JSON validation")]
struct Cli {
    /// Config file (defaults to ./shape.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema file (overrides the config file and SHAPE_SCHEMA)
    #[arg(long, short, global = true)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print `create table` statements for every table in the schema
    Ddl,

    /// Validate a JSON document against a named object shape
    Validate {
        /// Object name from the schema file
        object: String,

        /// JSON input file; reads stdin when omitted or "-"
        input: Option<PathBuf>,
    },

    /// Load the schema and list its objects and tables
    Check,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::resolve(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&config.logging).context("initializing logging")?;

    let schema_path = cli.schema.unwrap_or_else(|| config.schema.path.clone());
    let schema = SchemaFile::load(&schema_path)
        .with_context(|| format!("loading schema {}", schema_path.display()))?;
    info!(
        path = %schema_path.display(),
        objects = schema.objects.len(),
        tables = schema.tables.len(),
        "schema loaded"
    );

    match cli.command {
        Command::Ddl => {
            println!("{}", shape_sql::render_all(&schema.tables()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { object, input } => {
            let descriptor = schema.object(&object, config.validation.presence)?;
            let value = read_input(input.as_deref())?;

            let report = Report::from(descriptor.validate(&value));
            debug!(object = %object, success = report.success, "validated input");
            println!("{}", serde_json::to_string_pretty(&report)?);

            Ok(if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Check => {
            for spec in &schema.objects {
                println!("object {} ({} fields)", spec.name, spec.fields.len());
            }
            for spec in &schema.tables {
                println!("table {} ({} columns)", spec.name, spec.columns.len());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Value> {
    let contents = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&contents).context("input is not valid JSON")
}
