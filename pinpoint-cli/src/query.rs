//! Read-only commands: `recent`, `search`, `stats` and `export`.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pinpoint_core::{QueryEngine, QueryLimits};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_SEARCH_X, ARG_SEARCH_Z, CliError, ENV_SEARCH_X, ENV_SEARCH_Z, render,
    store::{database_or_default, open_engine},
    write_reply,
};

/// CLI arguments for the `recent` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "recent", about = "List the most recently logged coordinates")]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct RecentArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Number of coordinates to show (default 10, max 25).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<u32>,
}

/// Resolved `recent` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecentConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) count: Option<u32>,
}

impl From<RecentArgs> for RecentConfig {
    fn from(args: RecentArgs) -> Self {
        Self {
            database: database_or_default(args.database),
            count: args.count,
        }
    }
}

impl RecentArgs {
    fn into_config(self) -> Result<RecentConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RecentConfig::from(merged))
    }
}

pub(crate) fn run_recent(args: RecentArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let engine = open_engine(&config.database)?;
    write_reply(writer, &execute_recent(&engine, &config)?)
}

pub(crate) fn execute_recent(
    engine: &QueryEngine,
    config: &RecentConfig,
) -> Result<String, CliError> {
    let records = engine.recent(config.count)?;
    Ok(render::recent(&records, Utc::now()))
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "search",
    about = "Search coordinates near a location",
    long_about = "Find logged coordinates whose X and Z both lie within the \
                  radius of the given point, nearest first. The vertical axis \
                  is ignored."
)]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct SearchArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// X coordinate of the search centre.
    #[arg(long = ARG_SEARCH_X, value_name = "x", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) x: Option<i64>,
    /// Z coordinate of the search centre.
    #[arg(long = ARG_SEARCH_Z, value_name = "z", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) z: Option<i64>,
    /// Search radius in blocks (default 1000).
    #[arg(long, value_name = "blocks", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) radius: Option<i64>,
}

/// Resolved `search` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) x: i64,
    pub(crate) z: i64,
    pub(crate) radius: Option<i64>,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let x = args.x.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_X,
            env: ENV_SEARCH_X,
        })?;
        let z = args.z.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_Z,
            env: ENV_SEARCH_Z,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            x,
            z,
            radius: args.radius,
        })
    }
}

impl SearchArgs {
    fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

pub(crate) fn run_search(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let engine = open_engine(&config.database)?;
    write_reply(writer, &execute_search(&engine, &config)?)
}

pub(crate) fn execute_search(
    engine: &QueryEngine,
    config: &SearchConfig,
) -> Result<String, CliError> {
    let outcome = engine.search(config.x, config.z, config.radius)?;
    Ok(render::search(
        &outcome,
        engine.limits().search_display_limit,
    ))
}

/// CLI arguments for the `stats` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "stats", about = "Show coordinate statistics")]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct StatsArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

pub(crate) fn run_stats(args: StatsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let engine = open_engine(&database_or_default(merged.database))?;
    write_reply(writer, &execute_stats(&engine)?)
}

pub(crate) fn execute_stats(engine: &QueryEngine) -> Result<String, CliError> {
    Ok(render::stats(&engine.stats()?))
}

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "export",
    about = "Export recent coordinates as text",
    long_about = "Print the newest coordinates, one `x, y, z` line each. The \
                  listing stops at --cap records and is cut on a line boundary \
                  once it would exceed --max-bytes."
)]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct ExportArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Maximum number of records to export (default 50).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) cap: Option<usize>,
    /// Maximum size of the exported text in bytes (default 1900).
    #[arg(long = "max-bytes", value_name = "bytes")]
    #[serde(default)]
    pub(crate) max_bytes: Option<usize>,
}

/// Resolved `export` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) limits: QueryLimits,
}

impl From<ExportArgs> for ExportConfig {
    fn from(args: ExportArgs) -> Self {
        let defaults = QueryLimits::default();
        let limits = defaults
            .with_export_cap(args.cap.unwrap_or(defaults.export_cap))
            .with_export_max_bytes(args.max_bytes.unwrap_or(defaults.export_max_bytes));
        Self {
            database: database_or_default(args.database),
            limits,
        }
    }
}

pub(crate) fn run_export(args: ExportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ExportConfig::from(merged);
    let engine = open_engine(&config.database)?.with_limits(config.limits);
    write_reply(writer, &execute_export(&engine)?)
}

pub(crate) fn execute_export(engine: &QueryEngine) -> Result<String, CliError> {
    Ok(render::export(&engine.export()?))
}

#[cfg(test)]
pub(crate) fn search_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
