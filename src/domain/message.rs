use chrono::{DateTime, Utc};

/// The logged-in customer on whose behalf all outbound frames are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub id: i64,
    pub name: String,
}

/// Who authored a message within a support conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    /// The logged-in customer (this client).
    User,
    /// A support agent on the storefront side.
    Admin,
}

/// Kind of media attached to a message, derived from its media type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    File,
}

impl AttachmentKind {
    /// Maps a wire `media_type` (MIME string or bare category) to a kind.
    pub fn from_media_type(media_type: &str) -> Self {
        let category = media_type.split('/').next().unwrap_or_default();
        match category {
            "image" => AttachmentKind::Image,
            "video" => AttachmentKind::Video,
            "audio" => AttachmentKind::Audio,
            _ => AttachmentKind::File,
        }
    }

    /// Returns a display label for the attachment kind.
    pub fn display_label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "[Image]",
            AttachmentKind::Video => "[Video]",
            AttachmentKind::Audio => "[Audio]",
            AttachmentKind::File => "[File]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub kind: AttachmentKind,
}

/// Delivery status of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryState {
    /// Optimistic placeholder awaiting the server echo.
    Pending,
    /// Confirmed by the server.
    #[default]
    Sent,
    /// The transport write failed after the placeholder was inserted.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Server-assigned id; `None` while the message is an unconfirmed
    /// optimistic placeholder.
    pub id: Option<i64>,
    /// Client-generated id used to reconcile the placeholder with its echo.
    pub temp_id: Option<String>,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub sender_id: i64,
    pub sender_name: String,
    pub sender_type: SenderType,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub delivery: DeliveryState,
}

impl ChatMessage {
    pub fn is_outgoing(&self) -> bool {
        self.sender_type == SenderType::User
    }

    /// Returns the display content: attachment label + text, or just text.
    pub fn display_content(&self) -> String {
        match (&self.attachment, self.content.is_empty()) {
            (Some(attachment), true) => attachment.kind.display_label().to_owned(),
            (Some(attachment), false) => {
                format!("{} {}", attachment.kind.display_label(), self.content)
            }
            (None, _) => self.content.clone(),
        }
    }
}
