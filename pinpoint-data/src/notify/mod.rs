//! Chat-channel notifier posting coordinate announcements over HTTP.
//!
//! [`ChannelNotifier`] implements the synchronous
//! [`NotificationSink`] trait by spawning each request onto a Tokio runtime
//! and returning straight away. Delivery results are logged; the ingestion
//! outcome never depends on them.
//!
//! # Example
//!
//! ```no_run
//! use pinpoint_data::notify::{ChannelNotifier, ChannelNotifierConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ChannelNotifierConfig::new("bot-token", "123456789");
//! let notifier = ChannelNotifier::new(config, tokio::runtime::Handle::current())?;
//! # let _ = notifier;
//! # Ok(())
//! # }
//! ```

use std::{fmt, time::Duration};

use log::{debug, warn};
use pinpoint_core::{Coordinate, NotificationError, NotificationSink};
use reqwest::{Client, header::AUTHORIZATION};
use thiserror::Error;
use tokio::runtime::Handle;

mod message;

pub use message::{ChannelMessage, EMBED_COLOUR, EmbedField, EmbedFooter, MessageEmbed};

/// Default chat API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Default user agent for notifier requests.
pub const DEFAULT_USER_AGENT: &str = "pinpoint-notifier/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error raised when a [`ChannelNotifier`] cannot be built.
#[derive(Debug, Error)]
pub enum NotifierBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Configuration for [`ChannelNotifier`].
#[derive(Clone)]
pub struct ChannelNotifierConfig {
    /// Base URL of the chat API, without a trailing path.
    pub api_base: String,
    /// Bot token sent in the `Authorization` header.
    pub token: String,
    /// Channel receiving the announcements.
    pub channel_id: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for ChannelNotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelNotifierConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ChannelNotifierConfig {
    /// Create a configuration for `channel_id` authenticated with `token`.
    #[must_use]
    pub fn new(token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token: token.into(),
            channel_id: channel_id.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the notifier at a different API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Notification sink posting announcements to a chat channel.
pub struct ChannelNotifier {
    client: Client,
    config: ChannelNotifierConfig,
    runtime: Handle,
}

impl fmt::Debug for ChannelNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelNotifier")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Handle>")
            .finish_non_exhaustive()
    }
}

impl ChannelNotifier {
    /// Build a notifier that spawns its requests onto `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierBuildError::HttpClient`] if the HTTP client fails to
    /// build.
    pub fn new(config: ChannelNotifierConfig, runtime: Handle) -> Result<Self, NotifierBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(NotifierBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Endpoint receiving channel messages.
    fn messages_url(&self) -> String {
        format!(
            "{}/channels/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.channel_id
        )
    }

    fn request(&self, coordinate: &Coordinate) -> MessageRequest {
        MessageRequest {
            client: self.client.clone(),
            url: self.messages_url(),
            authorization: format!("Bot {}", self.config.token),
            message: ChannelMessage::for_coordinate(coordinate),
        }
    }

    /// Post the announcement for `coordinate` and wait for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Rejected`] for a non-success status and
    /// [`NotificationError::Transport`] when the request cannot complete.
    pub async fn send(&self, coordinate: &Coordinate) -> Result<(), NotificationError> {
        self.request(coordinate).post().await
    }
}

impl NotificationSink for ChannelNotifier {
    fn deliver(&self, coordinate: &Coordinate) -> Result<(), NotificationError> {
        let request = self.request(coordinate);
        let id = coordinate.id;
        self.runtime.spawn(async move {
            match request.post().await {
                Ok(()) => debug!("announced coordinate #{id}"),
                Err(err) => warn!("failed to announce coordinate #{id}: {err}"),
            }
        });
        Ok(())
    }
}

/// Owned request data, so delivery can outlive the caller's borrow.
struct MessageRequest {
    client: Client,
    url: String,
    authorization: String,
    message: ChannelMessage,
}

impl MessageRequest {
    async fn post(self) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.authorization)
            .json(&self.message)
            .send()
            .await
            .map_err(|err| transport_error(&err, &self.url))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(error: &reqwest::Error, url: &str) -> NotificationError {
    let message = if error.is_timeout() {
        format!("request to {url} timed out")
    } else {
        format!("request to {url} failed: {error}")
    };
    NotificationError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://chat.example.com/api", "https://chat.example.com/api/channels/42/messages")]
    #[case("https://chat.example.com/api/", "https://chat.example.com/api/channels/42/messages")]
    #[tokio::test]
    async fn messages_url_joins_channel(#[case] base: &str, #[case] expected: &str) {
        let config = ChannelNotifierConfig::new("token", "42").with_api_base(base);
        let notifier = ChannelNotifier::new(config, Handle::current()).expect("notifier builds");
        assert_eq!(notifier.messages_url(), expected);
    }

    #[rstest]
    fn debug_output_redacts_token() {
        let config = ChannelNotifierConfig::new("super-secret", "42");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
