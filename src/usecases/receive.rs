//! Inbound session-event pipeline.
//!
//! Every event the chat worker emits passes through [`apply_session_event`]
//! exactly once, on the UI thread. Read receipts go back over the same
//! transport: an admin message that arrives while the chat is visible is
//! acknowledged immediately, otherwise the unread badge is refreshed
//! instead.

use std::time::Instant;

use crate::domain::{
    events::{ConnectionState, SessionEvent},
    message::ChatMessage,
    shell_state::ShellState,
    toast::Toast,
    transcript::TranscriptUiState,
};

use super::contracts::ChatTransport;
use crate::chat::frames::ClientFrame;

/// Server error frames are log-only except for rate limiting, which the
/// user can act on by slowing down.
fn is_rate_limit_message(message: &str) -> bool {
    message.to_lowercase().contains("rate limit")
}

pub fn apply_session_event(
    transport: &dyn ChatTransport,
    state: &mut ShellState,
    event: SessionEvent,
    now: Instant,
) {
    match event {
        SessionEvent::Connection(connection) => {
            match connection {
                // A rendered transcript stays up across reconnects; only a
                // never-loaded one shows the loading state.
                ConnectionState::Connecting
                    if matches!(
                        state.transcript().ui_state(),
                        TranscriptUiState::Empty | TranscriptUiState::Error
                    ) =>
                {
                    state.transcript_mut().set_loading();
                }
                // The socket dropped before any history arrived.
                ConnectionState::Reconnecting | ConnectionState::Disconnected
                    if state.transcript().ui_state() == TranscriptUiState::Loading =>
                {
                    state.transcript_mut().set_error();
                }
                _ => {}
            }
            state.set_connection(connection);
        }
        SessionEvent::HistoryLoaded(messages) => {
            state.transcript_mut().replace_history(messages);
        }
        SessionEvent::MessageReceived(message) => {
            apply_incoming_message(transport, state, message);
        }
        SessionEvent::MessageRead { message_id } => {
            state.transcript_mut().mark_read(message_id);
        }
        SessionEvent::UnreadCount(count) => {
            state.unread_mut().set(count);
        }
        SessionEvent::ServerError { message } => {
            if is_rate_limit_message(&message) {
                state.show_toast(Toast::error(
                    "You're sending messages too quickly. Please wait a moment.",
                    now,
                ));
            } else {
                tracing::warn!(message, "server reported a chat error");
            }
            state.composer_mut().clear_busy();
        }
        SessionEvent::SendFailed { temp_id, reason } => {
            match temp_id {
                Some(temp_id) => {
                    state.outbox_mut().fail(&temp_id);
                    state.transcript_mut().mark_failed(&temp_id);
                }
                // Failed attachment sends have no placeholder; drop the
                // selection so the next submit starts clean.
                None => state.composer_mut().clear_attachment(),
            }
            state.show_toast(Toast::error(
                format!("Message was not sent: {reason}"),
                now,
            ));
            state.composer_mut().clear_busy();
        }
        SessionEvent::AttachmentSent => {
            state.composer_mut().clear_attachment();
            state.composer_mut().clear_text();
            state.composer_mut().clear_busy();
        }
    }
}

fn apply_incoming_message(
    transport: &dyn ChatTransport,
    state: &mut ShellState,
    message: ChatMessage,
) {
    let is_admin = !message.is_outgoing();
    let message_id = message.id;

    // Reconcile the echo of our own optimistic send before considering an
    // append, so the message never shows up twice.
    let mut reconciled = false;
    if let Some(temp_id) = message.temp_id.clone() {
        if state.outbox_mut().resolve(&temp_id).is_some() {
            reconciled = state
                .transcript_mut()
                .resolve_pending(&temp_id, message.clone());
        }
    }

    if !reconciled {
        state.transcript_mut().append(message);
    }

    if !is_admin {
        return;
    }

    if state.chat_visible() {
        if let Some(message_id) = message_id {
            if let Err(error) = transport.send_frame(ClientFrame::MarkRead { message_id }) {
                tracing::warn!(error = %error, "could not acknowledge message read");
            }
        }
    } else if let Err(error) = transport.send_frame(ClientFrame::GetUnreadCount) {
        tracing::warn!(error = %error, "could not refresh unread count");
    }
}
