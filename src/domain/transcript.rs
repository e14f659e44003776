use super::message::{ChatMessage, DeliveryState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Ordered transcript of the support conversation.
///
/// The server is trusted to deliver history and appends in timestamp order;
/// the transcript never re-sorts. A full history load replaces everything,
/// a single append only pushes to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptState {
    messages: Vec<ChatMessage>,
    ui_state: TranscriptUiState,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            ui_state: TranscriptUiState::Empty,
        }
    }
}

impl TranscriptState {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn ui_state(&self) -> TranscriptUiState {
        self.ui_state
    }

    pub fn set_loading(&mut self) {
        self.ui_state = TranscriptUiState::Loading;
    }

    /// Replaces the whole transcript with a server-provided history.
    ///
    /// Total by design: an empty list still transitions to `Ready` so the
    /// renderer shows the empty-state block instead of a stale transcript.
    pub fn replace_history(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.ui_state = TranscriptUiState::Ready;
    }

    /// Appends a single new message to the end of the transcript.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.ui_state = TranscriptUiState::Ready;
    }

    /// Replaces the placeholder carrying `temp_id` with its confirmed echo.
    ///
    /// Returns false when no placeholder matches; callers then append the
    /// confirmed message instead.
    pub fn resolve_pending(&mut self, temp_id: &str, confirmed: ChatMessage) -> bool {
        let slot = self
            .messages
            .iter_mut()
            .find(|message| message.temp_id.as_deref() == Some(temp_id));

        match slot {
            Some(placeholder) => {
                *placeholder = confirmed;
                true
            }
            None => false,
        }
    }

    /// Marks the placeholder carrying `temp_id` as failed, keeping it
    /// visible so the user sees the send did not go through.
    pub fn mark_failed(&mut self, temp_id: &str) -> bool {
        let slot = self
            .messages
            .iter_mut()
            .find(|message| message.temp_id.as_deref() == Some(temp_id));

        match slot {
            Some(placeholder) => {
                placeholder.delivery = DeliveryState::Failed;
                true
            }
            None => false,
        }
    }

    /// Flips the read flag on the message with the given server id.
    /// Purely cosmetic; unread tracking is the badge counter, not a list.
    pub fn mark_read(&mut self, message_id: i64) -> bool {
        let slot = self
            .messages
            .iter_mut()
            .find(|message| message.id == Some(message_id));

        match slot {
            Some(message) => {
                message.read = true;
                true
            }
            None => false,
        }
    }

    pub fn set_error(&mut self) {
        self.ui_state = TranscriptUiState::Error;
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::message::SenderType;

    fn message(id: i64, text: &str, ts: i64) -> ChatMessage {
        ChatMessage {
            id: Some(id),
            temp_id: None,
            content: text.to_owned(),
            attachment: None,
            sender_id: 1,
            sender_name: "Ada".to_owned(),
            sender_type: SenderType::User,
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            read: false,
            delivery: DeliveryState::Sent,
        }
    }

    fn placeholder(temp_id: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id: None,
            temp_id: Some(temp_id.to_owned()),
            content: text.to_owned(),
            attachment: None,
            sender_id: 1,
            sender_name: "Ada".to_owned(),
            sender_type: SenderType::User,
            timestamp: Utc::now(),
            read: false,
            delivery: DeliveryState::Pending,
        }
    }

    #[test]
    fn default_state_is_empty() {
        let state = TranscriptState::default();

        assert_eq!(state.ui_state(), TranscriptUiState::Empty);
        assert!(state.messages().is_empty());
    }

    #[test]
    fn replace_history_with_empty_list_still_becomes_ready() {
        let mut state = TranscriptState::default();
        state.append(message(1, "old", 100));

        state.replace_history(vec![]);

        assert_eq!(state.ui_state(), TranscriptUiState::Ready);
        assert!(state.is_empty());
    }

    #[test]
    fn replace_history_discards_previous_render() {
        let mut state = TranscriptState::default();
        state.append(message(1, "stale", 100));

        state.replace_history(vec![message(2, "fresh", 200)]);

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].content, "fresh");
    }

    #[test]
    fn append_preserves_existing_order() {
        let mut state = TranscriptState::default();
        state.replace_history(vec![
            message(1, "t1", 100),
            message(2, "t2", 200),
            message(3, "t3", 300),
        ]);

        state.append(message(4, "t4", 400));

        let ids: Vec<_> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn append_does_not_resort_out_of_order_delivery() {
        // The server owns ordering; a late frame stays where it arrived.
        let mut state = TranscriptState::default();
        state.replace_history(vec![message(1, "t1", 300)]);

        state.append(message(2, "earlier", 100));

        let ids: Vec<_> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn resolve_pending_swaps_placeholder_for_echo() {
        let mut state = TranscriptState::default();
        state.append(placeholder("tmp-1", "Hello"));

        let mut confirmed = message(9, "Hello", 500);
        confirmed.temp_id = Some("tmp-1".to_owned());
        let resolved = state.resolve_pending("tmp-1", confirmed);

        assert!(resolved);
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].id, Some(9));
        assert_eq!(state.messages()[0].delivery, DeliveryState::Sent);
    }

    #[test]
    fn resolve_pending_without_match_reports_false() {
        let mut state = TranscriptState::default();

        let resolved = state.resolve_pending("tmp-unknown", message(9, "Hi", 500));

        assert!(!resolved);
        assert!(state.is_empty());
    }

    #[test]
    fn mark_failed_keeps_placeholder_visible() {
        let mut state = TranscriptState::default();
        state.append(placeholder("tmp-1", "Hello"));

        assert!(state.mark_failed("tmp-1"));
        assert_eq!(state.messages()[0].delivery, DeliveryState::Failed);
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn mark_read_flips_flag_for_matching_id() {
        let mut state = TranscriptState::default();
        state.replace_history(vec![message(1, "a", 100), message(2, "b", 200)]);

        assert!(state.mark_read(2));
        assert!(!state.messages()[0].read);
        assert!(state.messages()[1].read);
    }

    #[test]
    fn mark_read_for_unknown_id_reports_false() {
        let mut state = TranscriptState::default();
        state.replace_history(vec![message(1, "a", 100)]);

        assert!(!state.mark_read(99));
    }
}
