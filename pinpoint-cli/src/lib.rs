//! Command-line interface for the Pinpoint coordinate log.
//!
//! Every subcommand layers its options from CLI flags, `PINPOINT_CMDS_*`
//! environment variables and configuration files through `ortho_config`,
//! then converts the merged arguments into a validated configuration.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use log::debug;

mod error;
mod manage;
mod query;
mod render;
mod serve;
mod store;

pub use error::CliError;

use manage::{ClearAllArgs, DeleteArgs};
use query::{ExportArgs, RecentArgs, SearchArgs, StatsArgs};
use serve::ServeArgs;

const ARG_DATABASE: &str = "database";
const ARG_SEARCH_X: &str = "x";
const ARG_SEARCH_Z: &str = "z";
const ARG_DELETE_ID: &str = "id";
const ENV_SEARCH_X: &str = "PINPOINT_CMDS_SEARCH_X";
const ENV_SEARCH_Z: &str = "PINPOINT_CMDS_SEARCH_Z";
const ENV_DELETE_ID: &str = "PINPOINT_CMDS_DELETE_ID";

/// Run the Pinpoint CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// store cannot be opened or fails, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    init_logging();
    let mut stdout = std::io::stdout().lock();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            return write_reply(&mut stdout, err.render().to_string().trim_end());
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Serve(args) => serve::run_serve(args),
        Command::Recent(args) => query::run_recent(args, &mut stdout),
        Command::Search(args) => query::run_search(args, &mut stdout),
        Command::Stats(args) => query::run_stats(args, &mut stdout),
        Command::Delete(args) => manage::run_delete(args, &mut stdout),
        Command::ClearAll(args) => manage::run_clear_all(args, &mut stdout),
        Command::Export(args) => query::run_export(args, &mut stdout),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        debug!("logger already installed");
    }
}

/// Write a command reply followed by a newline.
fn write_reply(writer: &mut dyn Write, reply: &str) -> Result<(), CliError> {
    writeln!(writer, "{reply}").map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "pinpoint",
    about = "Log, search and manage game-world coordinates",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the webhook receiver and health endpoint.
    Serve(ServeArgs),
    /// List the most recently logged coordinates.
    Recent(RecentArgs),
    /// Search coordinates near a location.
    Search(SearchArgs),
    /// Show coordinate statistics.
    Stats(StatsArgs),
    /// Delete a coordinate by ID.
    Delete(DeleteArgs),
    /// Delete ALL coordinates (requires --confirm).
    ClearAll(ClearAllArgs),
    /// Export recent coordinates as text.
    Export(ExportArgs),
}

#[cfg(test)]
mod tests;
