//! Binary entry point for the mmv CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Summary of everything in the data directory
//! mmv --dir mappings stats
//!
//! # One class with its members and current override names
//! mmv --dir mappings class net/minecraft/world/World
//!
//! # Find a symbolic name
//! mmv --dir mappings lookup func_72838_d
//!
//! # Rename a method and save the override CSVs (a backup is kept)
//! mmv --dir mappings rename method func_72838_d addEntity --comment "Adds an entity"
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mmv::cli::{run_class, run_lookup, run_rename, run_stats};
use mmv::commands::MemberKind;
use mmv::error::{MmvError, MmvResult};
use mmv::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Browse TSRG mappings and edit CSV name overrides.
///
/// All output is JSON.
#[derive(Parser, Debug)]
#[command(name = "mmv", version, about = "Browse TSRG mappings and edit CSV name overrides")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Mapping data directory (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Member kind accepted by `rename`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Field,
    Method,
    Param,
}

impl From<KindArg> for MemberKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Field => MemberKind::Field,
            KindArg::Method => MemberKind::Method,
            KindArg::Param => MemberKind::Param,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Count packages, classes, members and overrides.
    Stats,
    /// Show one class by qualified name (package/Class).
    Class {
        /// Qualified class name, e.g. net/minecraft/world/World.
        name: String,
    },
    /// Find a method, field or parameter by symbolic name.
    Lookup {
        /// Symbolic name, e.g. func_72838_d.
        srg_name: String,
    },
    /// Rename a member and save the override CSVs.
    Rename {
        /// Kind of member to rename.
        #[arg(value_enum)]
        kind: KindArg,
        /// Symbolic name of the member.
        srg_name: String,
        /// New human-readable name.
        new_name: String,
        /// Comment to store with a field or method override.
        #[arg(long)]
        comment: Option<String>,
        /// Emit a forced directive instead of a suggestion.
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Errors go to stdout as JSON, like every other response.
            let response = ErrorResponse::from_error(&err);
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> MmvResult<()> {
    let dir = cli.global.dir.as_path();
    match cli.command {
        Command::Stats => print(run_stats(dir)?),
        Command::Class { name } => print(run_class(dir, &name)?),
        Command::Lookup { srg_name } => print(run_lookup(dir, &srg_name)?),
        Command::Rename {
            kind,
            srg_name,
            new_name,
            comment,
            force,
        } => print(run_rename(
            dir,
            kind.into(),
            &srg_name,
            &new_name,
            comment.as_deref(),
            force,
        )?),
    }
}

/// Print a success response to stdout.
fn print<T: Serialize>(response: T) -> MmvResult<()> {
    let mut stdout = io::stdout();
    emit_response(&response, &mut stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| MmvError::io("<stdout>", e))
}
