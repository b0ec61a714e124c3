//! TCS CLI - inspect and query telephony configuration

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tcs_config::BuildError;
use tcs_error_reporting::DiagnosticMessage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::ContextArgs;
use commands::get::ValueType;

#[derive(Parser)]
#[command(name = "tcs")]
#[command(version)]
#[command(about = "Inspect layered telephony configuration", long_about = None)]
struct Cli {
    #[command(flatten)]
    context: ContextArgs,

    /// Report fatal errors as JSON diagnostics
    #[arg(long, global = true)]
    json_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged configuration tree
    Print,

    /// Serialize the merged configuration tree as XML
    Xml {
        /// Write to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up one value
    Get {
        /// Group path, e.g. `crm1.hal` or `.hal` relative to --group
        path: String,

        /// Key of the value, or name of the list with --type list
        key: String,

        /// Value type to read
        #[arg(long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
    },

    /// Walk the groups of an array group
    Array {
        /// Path whose last segment names the repeated group
        path: String,

        /// Print this string value of each group instead of the whole group
        #[arg(long)]
        key: Option<String>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tcs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    if let Err(err) = run(cli) {
        report(&err, json_errors);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = cli.context.open()?;

    match cli.command {
        Commands::Print => commands::show::print(&ctx),
        Commands::Xml { output } => commands::show::xml(&ctx, output.as_deref()),
        Commands::Get {
            path,
            key,
            value_type,
        } => commands::get::execute(&mut ctx, &path, &key, value_type),
        Commands::Array { path, key } => commands::array::execute(&mut ctx, &path, key.as_deref()),
    }
}

/// Build errors render as diagnostics, with a snippet of the offending
/// document when it can be read back.
fn report(err: &anyhow::Error, json: bool) {
    let Some(build_error) = err.downcast_ref::<BuildError>() else {
        eprintln!("Error: {:#}", err);
        return;
    };

    eprint!("{}", render_diagnostic(&build_error.to_diagnostic(), json));
}

fn render_diagnostic(diagnostic: &DiagnosticMessage, json: bool) -> String {
    if json {
        return match serde_json::to_string_pretty(&diagnostic.to_json()) {
            Ok(text) => format!("{}\n", text),
            Err(err) => format!("Error: {}: {}\n", diagnostic.title, err),
        };
    }

    let source = diagnostic
        .location
        .as_ref()
        .and_then(|location| location.file.as_deref())
        .and_then(|file| std::fs::read_to_string(file).ok());
    diagnostic.to_text(source.as_deref())
}
