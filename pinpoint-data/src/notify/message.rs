//! Chat message announcing a stored coordinate.

use chrono::SecondsFormat;
use pinpoint_core::Coordinate;
use serde::Serialize;

/// Accent colour of coordinate announcements.
pub const EMBED_COLOUR: u32 = 0x0076_00FF;

/// Message body posted to a chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMessage {
    /// Rich embeds attached to the message.
    pub embeds: Vec<MessageEmbed>,
}

/// Rich embed describing one coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEmbed {
    /// Embed heading.
    pub title: String,
    /// Markdown body.
    pub description: String,
    /// Accent colour as `0xRRGGBB`.
    pub color: u32,
    /// Inline name/value pairs.
    pub fields: Vec<EmbedField>,
    /// Footer line.
    pub footer: EmbedFooter,
    /// RFC 3339 timestamp shown by the client.
    pub timestamp: String,
}

/// One inline field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Whether the field shares a row with its neighbours.
    pub inline: bool,
}

/// Footer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

impl ChannelMessage {
    /// Announcement for a freshly stored coordinate.
    #[must_use]
    pub fn for_coordinate(coordinate: &Coordinate) -> Self {
        let field = |name: &str, value: i64| EmbedField {
            name: name.to_owned(),
            value: value.to_string(),
            inline: true,
        };
        Self {
            embeds: vec![MessageEmbed {
                title: "New Coordinate Logged".to_owned(),
                description: format!("**Coords:** `{coordinate}`"),
                color: EMBED_COLOUR,
                fields: vec![
                    field("X", coordinate.x),
                    field("Y", coordinate.y),
                    field("Z", coordinate.z),
                ],
                footer: EmbedFooter {
                    text: format!("ID: #{} \u{2022} Sent by Glazed", coordinate.id),
                },
                timestamp: coordinate
                    .origin_timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            }],
        }
    }
}
