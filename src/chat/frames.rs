//! Wire frames for the customer chat protocol.
//!
//! Frames are JSON text messages discriminated by a `type` field. Both
//! directions are modeled as tagged unions so every server message type is
//! an explicit match arm; unrecognized types fold into `Unknown` and are
//! dropped by the dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::message::{Attachment, AttachmentKind, ChatMessage, DeliveryState, SenderType};

/// Client → server frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    GetHistory,
    GetUnreadCount,
    MarkRead {
        message_id: i64,
    },
    ChatMessage {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media_type: Option<String>,
        sender_id: i64,
        sender_name: String,
        sender_type: String,
        customer_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        temp_id: Option<String>,
    },
}

impl ClientFrame {
    /// Builds an outbound text message frame carrying a temp id for echo
    /// reconciliation.
    pub fn text_message(
        content: String,
        sender_id: i64,
        sender_name: String,
        temp_id: String,
    ) -> Self {
        Self::ChatMessage {
            content: Some(content),
            media_url: None,
            media_type: None,
            sender_id,
            sender_name,
            sender_type: "user".to_owned(),
            customer_id: sender_id,
            temp_id: Some(temp_id),
        }
    }

    /// Builds an outbound attachment frame. No text is required alongside
    /// an attachment.
    pub fn attachment_message(
        content: Option<String>,
        media_url: String,
        media_type: String,
        sender_id: i64,
        sender_name: String,
    ) -> Self {
        Self::ChatMessage {
            content: content.filter(|text| !text.trim().is_empty()),
            media_url: Some(media_url),
            media_type: Some(media_type),
            sender_id,
            sender_name,
            sender_type: "user".to_owned(),
            customer_id: sender_id,
            temp_id: None,
        }
    }

    pub fn temp_id(&self) -> Option<&str> {
        match self {
            Self::ChatMessage { temp_id, .. } => temp_id.as_deref(),
            _ => None,
        }
    }
}

/// Server → client frames.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    ChatMessage { message: WireMessage },
    ChatHistory { messages: Vec<WireMessage> },
    MessageRead { message_id: i64 },
    UnreadCount { count: u32 },
    Error { message: String },
    #[serde(other)]
    Unknown,
}

/// A chat message as the server serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub sender_type: String,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub temp_id: Option<String>,
}

impl WireMessage {
    pub fn into_domain(self) -> ChatMessage {
        let sender_type = if self.sender_type == "admin" {
            SenderType::Admin
        } else {
            SenderType::User
        };

        let attachment = self.media_url.map(|url| Attachment {
            url,
            kind: AttachmentKind::from_media_type(self.media_type.as_deref().unwrap_or_default()),
        });

        ChatMessage {
            id: self.id,
            temp_id: self.temp_id,
            content: self.content.unwrap_or_default(),
            attachment,
            sender_id: self.sender_id,
            sender_name: self.sender_name.unwrap_or_else(|| "Support".to_owned()),
            sender_type,
            timestamp: parse_timestamp(self.timestamp.as_deref()),
            read: self.read,
            delivery: DeliveryState::Sent,
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    match raw {
        Some(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(error) => {
                tracing::warn!(timestamp = text, error = %error, "unparseable message timestamp");
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}

/// Guarded frame decode: malformed JSON never reaches the dispatcher.
pub fn decode_frame(text: &str) -> Option<ServerFrame> {
    match serde_json::from_str(text) {
        Ok(frame) => Some(frame),
        Err(error) => {
            tracing::warn!(error = %error, "dropping malformed chat frame");
            None
        }
    }
}
