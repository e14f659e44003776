use std::time::Instant;

use super::{
    composer::ComposerState, events::ConnectionState, outbox::PendingOutbox, toast::Toast,
    transcript::TranscriptState, unread::UnreadBadge,
};

/// Aggregate state owned by the UI thread.
///
/// Everything the source kept as bare module-level globals lives here and
/// is mutated only by the shell orchestrator.
#[derive(Debug, Clone)]
pub struct ShellState {
    running: bool,
    chat_visible: bool,
    connection: ConnectionState,
    transcript: TranscriptState,
    composer: ComposerState,
    outbox: PendingOutbox,
    unread: UnreadBadge,
    toast: Option<Toast>,
}

impl ShellState {
    pub fn new(unread_display_cap: u32) -> Self {
        Self {
            running: true,
            chat_visible: true,
            connection: ConnectionState::Connecting,
            transcript: TranscriptState::default(),
            composer: ComposerState::default(),
            outbox: PendingOutbox::default(),
            unread: UnreadBadge::new(unread_display_cap),
            toast: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn chat_visible(&self) -> bool {
        self.chat_visible
    }

    pub fn set_chat_visible(&mut self, visible: bool) {
        self.chat_visible = visible;
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut TranscriptState {
        &mut self.transcript
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ComposerState {
        &mut self.composer
    }

    pub fn outbox(&self) -> &PendingOutbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut PendingOutbox {
        &mut self.outbox
    }

    pub fn unread(&self) -> &UnreadBadge {
        &self.unread
    }

    pub fn unread_mut(&mut self) -> &mut UnreadBadge {
        &mut self.unread
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    /// Drops an expired toast. Called on UI ticks.
    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now))
        {
            self.toast = None;
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(99)
    }
}
