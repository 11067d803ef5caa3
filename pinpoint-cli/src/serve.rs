//! `serve` command: the webhook receiver and health endpoint.
//!
//! Routes:
//! - `GET /` reports `{"status":"online","coords_logged":N}`.
//! - `POST /webhook` ingests an automation payload and replies per the
//!   webhook contract in [`pinpoint_data::webhook`].
//!
//! Store access is synchronous, so request handlers hop onto the blocking
//! pool before touching it.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use camino::Utf8PathBuf;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pinpoint_core::{IngestionPipeline, NoopSink, NotificationSink, QueryEngine};
use pinpoint_data::{
    ChannelNotifier, ChannelNotifierConfig, WebhookBody, WebhookReply, handle_webhook_body,
    webhook::INTERNAL_ERROR,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, runtime::Handle};

use crate::{
    ARG_DATABASE, CliError,
    store::{database_or_default, open_store},
};

/// Address the server listens on when `--bind` is not configured.
pub(crate) const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "serve",
    about = "Run the webhook receiver",
    long_about = "Accept coordinate pings on POST /webhook and report liveness \
                  on GET /. Stored coordinates are announced in a chat channel \
                  when both a bot token and a channel id are configured."
)]
#[ortho_config(prefix = "PINPOINT")]
pub(crate) struct ServeArgs {
    /// Coordinate database (`.json` selects the flat-file store).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Socket address to listen on (default 0.0.0.0:3000).
    #[arg(long, value_name = "addr")]
    #[serde(default)]
    pub(crate) bind: Option<String>,
    /// Bot token used to announce stored coordinates.
    #[arg(long = "bot-token", value_name = "token")]
    #[serde(default)]
    pub(crate) bot_token: Option<String>,
    /// Channel receiving the announcements.
    #[arg(long = "channel-id", value_name = "id")]
    #[serde(default)]
    pub(crate) channel_id: Option<String>,
    /// Override the chat API base URL.
    #[arg(long = "api-base", value_name = "url")]
    #[serde(default)]
    pub(crate) api_base: Option<String>,
}

/// Resolved `serve` configuration.
#[derive(Debug, Clone)]
pub(crate) struct ServeConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) bind: String,
    /// Present only when both the token and the channel are configured.
    pub(crate) notifier: Option<ChannelNotifierConfig>,
}

impl From<ServeArgs> for ServeConfig {
    fn from(args: ServeArgs) -> Self {
        let notifier = match (args.bot_token, args.channel_id) {
            (Some(token), Some(channel)) if !token.is_empty() && !channel.is_empty() => {
                let mut config = ChannelNotifierConfig::new(token, channel);
                if let Some(base) = args.api_base {
                    config = config.with_api_base(base);
                }
                Some(config)
            }
            _ => None,
        };
        Self {
            database: database_or_default(args.database),
            bind: args.bind.unwrap_or_else(|| DEFAULT_BIND.to_owned()),
            notifier,
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub(crate) struct AppState {
    pipeline: Arc<IngestionPipeline>,
    engine: QueryEngine,
}

impl AppState {
    pub(crate) fn new(pipeline: IngestionPipeline, engine: QueryEngine) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            engine,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    coords_logged: u64,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(WebhookBody::error(INTERNAL_ERROR)),
    )
        .into_response()
}

fn into_response(reply: WebhookReply) -> Response {
    let status = StatusCode::from_u16(reply.status.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}

async fn health(State(state): State<AppState>) -> Response {
    let engine = state.engine.clone();
    match tokio::task::spawn_blocking(move || engine.health()).await {
        Ok(Ok(health)) => Json(StatusBody {
            status: "online",
            coords_logged: health.coordinates,
        })
        .into_response(),
        Ok(Err(err)) => {
            warn!("health check failed: {err}");
            internal_error()
        }
        Err(err) => {
            warn!("health check task failed: {err}");
            internal_error()
        }
    }
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> Response {
    info!("received webhook ({} bytes)", body.len());
    let pipeline = Arc::clone(&state.pipeline);
    match tokio::task::spawn_blocking(move || handle_webhook_body(&pipeline, &body)).await {
        Ok(reply) => into_response(reply),
        Err(err) => {
            warn!("webhook task failed: {err}");
            internal_error()
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn build_sink(config: &ServeConfig) -> Result<Arc<dyn NotificationSink>, CliError> {
    let Some(notifier) = &config.notifier else {
        info!("chat notifications disabled (bot token or channel id not configured)");
        return Ok(Arc::new(NoopSink));
    };
    info!(
        "announcing stored coordinates in channel {}",
        notifier.channel_id
    );
    let sink = ChannelNotifier::new(notifier.clone(), Handle::current())?;
    Ok(Arc::new(sink))
}

pub(crate) fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ServeConfig::from(merged);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(serve(config))
}

async fn serve(config: ServeConfig) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let sink = build_sink(&config)?;
    let state = AppState::new(
        IngestionPipeline::new(Arc::clone(&store), sink),
        QueryEngine::new(store),
    );
    let listener = TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|source| CliError::Bind {
            address: config.bind.clone(),
            source,
        })?;
    info!(
        "webhook server listening on {}, POST /webhook to log coordinates",
        config.bind
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)
}
