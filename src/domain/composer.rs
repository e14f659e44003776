//! State for the message composer: text editing, the single pending
//! attachment slot, and the busy state that serializes sends.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

/// Maximum allowed composer length in characters.
const MAX_INPUT_LENGTH: usize = 2000;

/// A file selected for the next send. Only one may be pending at a time;
/// selecting a new file overwrites the previous selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Why the send control is currently disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyState {
    #[default]
    Idle,
    /// Short post-send smoothing delay; not a network wait.
    Cooldown { until: Instant },
    /// An upload-then-send is in flight; cleared by its completion event.
    Uploading,
}

/// Action derived from the composer text on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    Submit,
    Attach(PathBuf),
    Detach,
}

/// Parses composer commands (`/attach <path>`, `/detach`); everything else
/// is a plain submit.
pub fn parse_composer_action(text: &str) -> ComposerAction {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("/attach ") {
        return ComposerAction::Attach(PathBuf::from(rest.trim()));
    }

    if trimmed == "/detach" {
        return ComposerAction::Detach;
    }

    ComposerAction::Submit
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposerState {
    text: String,
    cursor_position: usize,
    attachment: Option<PendingAttachment>,
    busy: BusyState,
}

impl ComposerState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachment.is_none()
    }

    pub fn attachment(&self) -> Option<&PendingAttachment> {
        self.attachment.as_ref()
    }

    /// Overwrites any prior selection; there is no attachment queue.
    pub fn set_attachment(&mut self, attachment: PendingAttachment) {
        self.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn take_attachment(&mut self) -> Option<PendingAttachment> {
        self.attachment.take()
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.busy, BusyState::Idle)
    }

    pub fn busy(&self) -> BusyState {
        self.busy
    }

    pub fn begin_cooldown(&mut self, now: Instant, cooldown: Duration) {
        self.busy = BusyState::Cooldown {
            until: now + cooldown,
        };
    }

    pub fn begin_upload(&mut self) {
        self.busy = BusyState::Uploading;
    }

    /// Re-enables the send control immediately (error paths).
    pub fn clear_busy(&mut self) {
        self.busy = BusyState::Idle;
    }

    /// Clears an elapsed cooldown. Called on UI ticks; upload busy state is
    /// only cleared by an explicit completion event.
    pub fn tick(&mut self, now: Instant) {
        if let BusyState::Cooldown { until } = self.busy {
            if now >= until {
                self.busy = BusyState::Idle;
            }
        }
    }

    /// Inserts a character at the cursor.
    /// Returns false once the input would exceed the maximum length.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_INPUT_LENGTH {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor_position);
        self.text.insert(byte_idx, ch);
        self.cursor_position += 1;
        true
    }

    /// Deletes the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor_position);
            let next_byte_idx = self.char_to_byte_index(self.cursor_position + 1);
            self.text.drain(byte_idx..next_byte_idx);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete_char_at(&mut self) {
        let char_count = self.text.chars().count();
        if self.cursor_position < char_count {
            let byte_idx = self.char_to_byte_index(self.cursor_position);
            let next_byte_idx = self.char_to_byte_index(self.cursor_position + 1);
            self.text.drain(byte_idx..next_byte_idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let char_count = self.text.chars().count();
        if self.cursor_position < char_count {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.text.chars().count();
    }

    /// Clears the text and cursor, leaving the attachment slot alone.
    pub fn clear_text(&mut self) {
        self.text.clear();
        self.cursor_position = 0;
    }

    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str) -> PendingAttachment {
        PendingAttachment {
            path: PathBuf::from(format!("/tmp/{name}")),
            file_name: name.to_owned(),
            mime_type: "image/png".to_owned(),
            size: 1024,
        }
    }

    #[test]
    fn new_state_is_empty_and_idle() {
        let state = ComposerState::default();

        assert!(state.is_empty());
        assert!(!state.is_busy());
        assert_eq!(state.cursor_position(), 0);
    }

    #[test]
    fn insert_char_appends_and_moves_cursor() {
        let mut state = ComposerState::default();
        state.insert_char('H');
        state.insert_char('i');

        assert_eq!(state.text(), "Hi");
        assert_eq!(state.cursor_position(), 2);
    }

    #[test]
    fn insert_char_at_middle_position() {
        let mut state = ComposerState::default();
        state.insert_char('H');
        state.insert_char('o');
        state.move_cursor_left();
        state.insert_char('i');

        assert_eq!(state.text(), "Hio");
        assert_eq!(state.cursor_position(), 2);
    }

    #[test]
    fn delete_char_before_removes_previous_char() {
        let mut state = ComposerState::default();
        state.insert_char('H');
        state.insert_char('i');
        state.delete_char_before();

        assert_eq!(state.text(), "H");
        assert_eq!(state.cursor_position(), 1);
    }

    #[test]
    fn delete_char_before_at_start_does_nothing() {
        let mut state = ComposerState::default();
        state.insert_char('H');
        state.move_cursor_home();
        state.delete_char_before();

        assert_eq!(state.text(), "H");
    }

    #[test]
    fn delete_char_at_removes_current_char() {
        let mut state = ComposerState::default();
        state.insert_char('H');
        state.insert_char('i');
        state.move_cursor_home();
        state.delete_char_at();

        assert_eq!(state.text(), "i");
        assert_eq!(state.cursor_position(), 0);
    }

    #[test]
    fn handles_unicode_characters() {
        let mut state = ComposerState::default();
        for ch in "Привет".chars() {
            state.insert_char(ch);
        }

        assert_eq!(state.text(), "Привет");
        assert_eq!(state.cursor_position(), 6);

        state.delete_char_before();
        assert_eq!(state.text(), "Приве");
    }

    #[test]
    fn insert_char_respects_max_length_limit() {
        let mut state = ComposerState::default();
        for _ in 0..MAX_INPUT_LENGTH {
            assert!(state.insert_char('x'));
        }

        assert!(!state.insert_char('y'));
        assert_eq!(state.text().chars().count(), MAX_INPUT_LENGTH);
    }

    #[test]
    fn whitespace_only_text_counts_as_empty() {
        let mut state = ComposerState::default();
        state.insert_char(' ');
        state.insert_char('\t');

        assert!(state.is_empty());
    }

    #[test]
    fn attachment_alone_makes_composer_non_empty() {
        let mut state = ComposerState::default();
        state.set_attachment(attachment("a.png"));

        assert!(!state.is_empty());
    }

    #[test]
    fn new_attachment_overwrites_previous_selection() {
        let mut state = ComposerState::default();
        state.set_attachment(attachment("first.png"));
        state.set_attachment(attachment("second.png"));

        assert_eq!(
            state.attachment().map(|a| a.file_name.clone()),
            Some("second.png".to_owned())
        );
    }

    #[test]
    fn clear_text_keeps_attachment_slot() {
        let mut state = ComposerState::default();
        state.insert_char('x');
        state.set_attachment(attachment("a.png"));

        state.clear_text();

        assert_eq!(state.text(), "");
        assert!(state.attachment().is_some());
    }

    #[test]
    fn cooldown_clears_after_deadline() {
        let mut state = ComposerState::default();
        let start = Instant::now();
        state.begin_cooldown(start, Duration::from_millis(400));

        assert!(state.is_busy());

        state.tick(start + Duration::from_millis(100));
        assert!(state.is_busy());

        state.tick(start + Duration::from_millis(400));
        assert!(!state.is_busy());
    }

    #[test]
    fn tick_never_clears_upload_busy_state() {
        let mut state = ComposerState::default();
        state.begin_upload();

        state.tick(Instant::now() + Duration::from_secs(60));

        assert!(state.is_busy());

        state.clear_busy();
        assert!(!state.is_busy());
    }

    #[test]
    fn parses_attach_command() {
        assert_eq!(
            parse_composer_action("/attach /tmp/receipt.pdf"),
            ComposerAction::Attach(PathBuf::from("/tmp/receipt.pdf"))
        );
    }

    #[test]
    fn parses_detach_command() {
        assert_eq!(parse_composer_action(" /detach "), ComposerAction::Detach);
    }

    #[test]
    fn plain_text_is_a_submit() {
        assert_eq!(parse_composer_action("hello"), ComposerAction::Submit);
        assert_eq!(parse_composer_action("/attached files"), ComposerAction::Submit);
    }
}
