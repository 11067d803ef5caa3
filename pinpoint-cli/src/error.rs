//! Error types emitted by the Pinpoint CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use pinpoint_core::{QueryError, StoreError};
use pinpoint_data::NotifierBuildError;
use thiserror::Error;

/// Errors emitted by the Pinpoint CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply the option.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Name of the required feature.
        feature: &'static str,
        /// Operation that needed the feature.
        action: &'static str,
    },
    /// The database directory could not be prepared.
    #[error("failed to prepare directory for {path:?}: {source}")]
    PrepareDatabase {
        /// Database path whose directory could not be prepared.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the coordinate store failed.
    #[error("failed to open coordinate store at {path:?}: {source}")]
    OpenStore {
        /// Path of the store that failed to open.
        path: Utf8PathBuf,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// A command was rejected or the store failed while answering it.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Constructing the chat notifier failed.
    #[error(transparent)]
    BuildNotifier(#[from] NotifierBuildError),
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Binding the HTTP listener failed.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that could not be bound.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}
