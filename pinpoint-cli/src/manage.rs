//! Mutating commands: `delete` and `clear-all`.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pinpoint_core::QueryEngine;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_DELETE_ID, CliError, ENV_DELETE_ID, render,
    store::{database_or_default, open_engine},
    write_reply,
};

/// CLI arguments for the `delete` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "delete", about = "Delete a coordinate by ID")]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct DeleteArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the coordinate to delete.
    #[arg(long = ARG_DELETE_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<u64>,
}

/// Resolved `delete` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeleteConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) id: u64,
}

impl TryFrom<DeleteArgs> for DeleteConfig {
    type Error = CliError;

    fn try_from(args: DeleteArgs) -> Result<Self, Self::Error> {
        let id = args.id.ok_or(CliError::MissingArgument {
            field: ARG_DELETE_ID,
            env: ENV_DELETE_ID,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            id,
        })
    }
}

pub(crate) fn run_delete(args: DeleteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = DeleteConfig::try_from(merged)?;
    let engine = open_engine(&config.database)?;
    write_reply(writer, &execute_delete(&engine, &config)?)
}

pub(crate) fn execute_delete(
    engine: &QueryEngine,
    config: &DeleteConfig,
) -> Result<String, CliError> {
    Ok(render::delete(engine.delete(config.id)?))
}

/// CLI arguments for the `clear-all` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "clear-all",
    about = "Delete ALL coordinates",
    long_about = "Delete every logged coordinate. Without --confirm nothing is \
                  removed and the number of records that would be deleted is \
                  reported instead. Identifiers are never reused afterwards."
)]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct ClearAllArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Acknowledge that every coordinate will be removed.
    #[arg(long)]
    #[serde(default)]
    pub(crate) confirm: bool,
}

/// Resolved `clear-all` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClearAllConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) confirmed: bool,
}

pub(crate) fn run_clear_all(args: ClearAllArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    // Confirmation only counts when typed on the command line.
    let confirmed = args.confirm;
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ClearAllConfig {
        database: database_or_default(merged.database),
        confirmed,
    };
    let engine = open_engine(&config.database)?;
    write_reply(writer, &execute_clear_all(&engine, &config)?)
}

pub(crate) fn execute_clear_all(
    engine: &QueryEngine,
    config: &ClearAllConfig,
) -> Result<String, CliError> {
    if !config.confirmed {
        let pending = engine.stats()?.total;
        info!("clear-all requested without confirmation; {pending} coordinates kept");
        return Ok(render::clear_pending(pending));
    }
    Ok(render::cleared(engine.clear_all()?))
}
