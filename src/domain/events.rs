use super::message::ChatMessage;

/// Events produced by the terminal event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    /// Terminal focus; the chat counts as visible only while focused.
    FocusChanged(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Connection lifecycle of the chat socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Closed; a single reconnect wait is pending.
    Reconnecting,
}

impl ConnectionState {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Disconnected => "offline",
            Self::Connecting => "connecting",
            Self::Connected => "online",
            Self::Reconnecting => "reconnecting",
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Events emitted by the chat session worker toward the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connection(ConnectionState),
    HistoryLoaded(Vec<ChatMessage>),
    MessageReceived(ChatMessage),
    MessageRead { message_id: i64 },
    UnreadCount(u32),
    /// Inbound `error`-type frame.
    ServerError { message: String },
    /// A frame write or upload failed; `temp_id` is set for text sends.
    SendFailed {
        temp_id: Option<String>,
        reason: String,
    },
    /// Upload-then-send completed and the frame is on the wire.
    AttachmentSent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_labels_are_stable() {
        assert_eq!(ConnectionState::Disconnected.as_label(), "offline");
        assert_eq!(ConnectionState::Connecting.as_label(), "connecting");
        assert_eq!(ConnectionState::Connected.as_label(), "online");
        assert_eq!(ConnectionState::Reconnecting.as_label(), "reconnecting");
    }

    #[test]
    fn only_connected_counts_as_connected() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(!ConnectionState::Reconnecting.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
    }
}
