//! Outbound send pipeline.
//!
//! Text sends go straight over the socket with an optimistic placeholder;
//! attachment sends are handed to the session worker for the
//! upload-then-send two-phase flow. Exactly one send is in flight per user
//! action: the composer busy state serializes them.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};

use crate::{
    chat::{
        frames::ClientFrame,
        upload::{check_size, mime_type_for_path, UploadError, UploadJob},
    },
    domain::{
        composer::PendingAttachment,
        message::{ChatMessage, CustomerIdentity, DeliveryState, SenderType},
        shell_state::ShellState,
    },
};

use super::contracts::ChatTransport;

/// Ambient inputs for one submit: who is sending and the tuning knobs.
#[derive(Debug, Clone)]
pub struct SendContext {
    pub identity: CustomerIdentity,
    pub max_attachment_bytes: u64,
    pub send_cooldown: Duration,
    pub now: DateTime<Utc>,
    pub clock: Instant,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SendError {
    /// Nothing to send; a silent no-op, not a user-facing error.
    Empty,
    /// A previous send is still in flight; the control is disabled.
    Busy,
    /// The socket is not open. No placeholder is inserted.
    NotConnected,
    /// The selected file disappeared or could not be read.
    AttachmentRead(String),
    /// The file grew past the cap since it was selected.
    AttachmentTooLarge { size: u64, max: u64 },
    /// The worker refused the command (session torn down).
    Transport,
}

impl SendError {
    /// Toast text for user-facing failures; `None` for silent ones.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Empty | Self::Busy => None,
            Self::NotConnected => Some("Not connected. Message was not sent.".to_owned()),
            Self::AttachmentRead(reason) => Some(format!("Could not read attachment: {reason}")),
            Self::AttachmentTooLarge { size, max } => Some(format!(
                "File is too large ({} MB, max {} MB).",
                size / (1024 * 1024),
                max / (1024 * 1024)
            )),
            Self::Transport => Some("Chat is unavailable. Message was not sent.".to_owned()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// A text frame went out; the placeholder carries this temp id.
    Text { temp_id: String },
    /// An upload-then-send was handed to the worker.
    Attachment,
}

/// Submits whatever the composer currently holds.
pub fn submit_composer(
    transport: &dyn ChatTransport,
    state: &mut ShellState,
    context: &SendContext,
) -> Result<Submission, SendError> {
    let text = state.composer().text().trim().to_owned();
    let has_attachment = state.composer().attachment().is_some();

    if text.is_empty() && !has_attachment {
        return Err(SendError::Empty);
    }

    if state.composer().is_busy() {
        return Err(SendError::Busy);
    }

    if !state.connection().is_connected() {
        return Err(SendError::NotConnected);
    }

    if has_attachment {
        submit_attachment(transport, state, context, text)
    } else {
        submit_text(transport, state, context, text)
    }
}

fn submit_text(
    transport: &dyn ChatTransport,
    state: &mut ShellState,
    context: &SendContext,
    text: String,
) -> Result<Submission, SendError> {
    let temp_id = uuid::Uuid::new_v4().to_string();

    // The connected check already passed, so the optimistic placeholder
    // can go in; a failed transmit below marks it failed rather than
    // leaving an orphaned empty bubble.
    state.transcript_mut().append(ChatMessage {
        id: None,
        temp_id: Some(temp_id.clone()),
        content: text.clone(),
        attachment: None,
        sender_id: context.identity.id,
        sender_name: context.identity.name.clone(),
        sender_type: SenderType::User,
        timestamp: context.now,
        read: false,
        delivery: DeliveryState::Pending,
    });
    state
        .outbox_mut()
        .insert(temp_id.clone(), text.clone(), context.now);

    let frame = ClientFrame::text_message(
        text,
        context.identity.id,
        context.identity.name.clone(),
        temp_id.clone(),
    );

    match transport.send_frame(frame) {
        Ok(()) => {
            state.composer_mut().clear_text();
            state
                .composer_mut()
                .begin_cooldown(context.clock, context.send_cooldown);
            Ok(Submission::Text { temp_id })
        }
        Err(_) => {
            state.outbox_mut().fail(&temp_id);
            state.transcript_mut().mark_failed(&temp_id);
            Err(SendError::Transport)
        }
    }
}

fn submit_attachment(
    transport: &dyn ChatTransport,
    state: &mut ShellState,
    context: &SendContext,
    text: String,
) -> Result<Submission, SendError> {
    let Some(attachment) = state.composer_mut().take_attachment() else {
        return Err(SendError::Empty);
    };

    // The selection was validated at attach time; revalidate in case the
    // file changed underneath us. Failures discard the attachment slot
    // (already taken) but keep the composer text for a retry.
    let data = fs::read(&attachment.path)
        .map_err(|error| SendError::AttachmentRead(error.to_string()))?;

    if let Err(UploadError::TooLarge { size, max }) =
        check_size(data.len() as u64, context.max_attachment_bytes)
    {
        return Err(SendError::AttachmentTooLarge { size, max });
    }

    let job = UploadJob {
        data,
        file_name: attachment.file_name,
        mime_type: attachment.mime_type,
        content: if text.is_empty() { None } else { Some(text) },
    };

    transport
        .send_attachment(job)
        .map_err(|_| SendError::Transport)?;

    // Composer text is cleared only on the AttachmentSent event, so a
    // failed upload leaves it in place for retry.
    state.composer_mut().begin_upload();
    Ok(Submission::Attachment)
}

#[derive(Debug, PartialEq, Eq)]
pub enum AttachError {
    Unreadable(String),
    NotAFile,
    TooLarge { size: u64, max: u64 },
}

impl AttachError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreadable(reason) => format!("Cannot attach file: {reason}"),
            Self::NotAFile => "Cannot attach: not a regular file.".to_owned(),
            Self::TooLarge { size, max } => format!(
                "File is too large ({} MB, max {} MB).",
                size / (1024 * 1024),
                max / (1024 * 1024)
            ),
        }
    }
}

/// Selects a file for the next send. Oversized files are rejected here and
/// never reach the upload endpoint; a valid selection overwrites any
/// previous one.
pub fn attach_file(
    state: &mut ShellState,
    path: PathBuf,
    max_attachment_bytes: u64,
) -> Result<(), AttachError> {
    let metadata =
        fs::metadata(&path).map_err(|error| AttachError::Unreadable(error.to_string()))?;

    if !metadata.is_file() {
        return Err(AttachError::NotAFile);
    }

    if let Err(UploadError::TooLarge { size, max }) =
        check_size(metadata.len(), max_attachment_bytes)
    {
        return Err(AttachError::TooLarge { size, max });
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment".to_owned());
    let mime_type = mime_type_for_path(&path).to_owned();

    state.composer_mut().set_attachment(PendingAttachment {
        file_name,
        mime_type,
        size: metadata.len(),
        path,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Write};

    use super::*;
    use crate::{
        domain::events::ConnectionState,
        usecases::contracts::{ChatTransport, TransportError},
    };

    #[derive(Default)]
    struct StubTransport {
        frames: RefCell<Vec<ClientFrame>>,
        jobs: RefCell<Vec<UploadJob>>,
        refuse: bool,
    }

    impl StubTransport {
        fn refusing() -> Self {
            Self {
                refuse: true,
                ..Self::default()
            }
        }
    }

    impl ChatTransport for StubTransport {
        fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError> {
            if self.refuse {
                return Err(TransportError::Closed);
            }
            self.frames.borrow_mut().push(frame);
            Ok(())
        }

        fn send_attachment(&self, job: UploadJob) -> Result<(), TransportError> {
            if self.refuse {
                return Err(TransportError::Closed);
            }
            self.jobs.borrow_mut().push(job);
            Ok(())
        }
    }

    fn context() -> SendContext {
        SendContext {
            identity: CustomerIdentity {
                id: 5,
                name: "Ada".to_owned(),
            },
            max_attachment_bytes: 10 * 1024 * 1024,
            send_cooldown: Duration::from_millis(400),
            now: Utc::now(),
            clock: Instant::now(),
        }
    }

    fn connected_state() -> ShellState {
        let mut state = ShellState::default();
        state.set_connection(ConnectionState::Connected);
        state
    }

    fn type_text(state: &mut ShellState, text: &str) {
        for ch in text.chars() {
            state.composer_mut().insert_char(ch);
        }
    }

    #[test]
    fn empty_submit_is_a_silent_no_op() {
        let transport = StubTransport::default();
        let mut state = connected_state();

        let result = submit_composer(&transport, &mut state, &context());

        assert_eq!(result, Err(SendError::Empty));
        assert!(transport.frames.borrow().is_empty());
        assert!(transport.jobs.borrow().is_empty());
        assert_eq!(SendError::Empty.user_message(), None);
    }

    #[test]
    fn whitespace_only_submit_is_empty() {
        let transport = StubTransport::default();
        let mut state = connected_state();
        type_text(&mut state, "   ");

        assert_eq!(
            submit_composer(&transport, &mut state, &context()),
            Err(SendError::Empty)
        );
    }

    #[test]
    fn happy_path_text_send_emits_exactly_one_frame_and_clears_composer() {
        let transport = StubTransport::default();
        let mut state = connected_state();
        type_text(&mut state, "Hello");

        let result = submit_composer(&transport, &mut state, &context());

        let Ok(Submission::Text { temp_id }) = result else {
            panic!("expected a text submission");
        };

        let frames = transport.frames.borrow();
        assert_eq!(frames.len(), 1);
        let ClientFrame::ChatMessage {
            content,
            sender_type,
            temp_id: frame_temp_id,
            ..
        } = &frames[0]
        else {
            panic!("expected a chat_message frame");
        };
        assert_eq!(content.as_deref(), Some("Hello"));
        assert_eq!(sender_type, "user");
        assert_eq!(frame_temp_id.as_deref(), Some(temp_id.as_str()));

        assert_eq!(state.composer().text(), "");
        assert!(state.composer().is_busy());
        assert!(state.outbox().contains(&temp_id));
        assert_eq!(state.transcript().messages().len(), 1);
        assert_eq!(
            state.transcript().messages()[0].delivery,
            DeliveryState::Pending
        );
    }

    #[test]
    fn disconnected_send_transmits_nothing_and_inserts_no_placeholder() {
        let transport = StubTransport::default();
        let mut state = ShellState::default();
        state.set_connection(ConnectionState::Reconnecting);
        type_text(&mut state, "Hello");

        let result = submit_composer(&transport, &mut state, &context());

        assert_eq!(result, Err(SendError::NotConnected));
        assert!(transport.frames.borrow().is_empty());
        // Decision (a): no orphaned optimistic bubble.
        assert!(state.transcript().messages().is_empty());
        assert!(state.outbox().is_empty());
        // The composer keeps the text and stays enabled.
        assert_eq!(state.composer().text(), "Hello");
        assert!(!state.composer().is_busy());
        assert!(SendError::NotConnected.user_message().is_some());
    }

    #[test]
    fn busy_composer_refuses_a_second_send() {
        let transport = StubTransport::default();
        let mut state = connected_state();
        type_text(&mut state, "first");
        submit_composer(&transport, &mut state, &context()).expect("first send must pass");

        type_text(&mut state, "second");
        let result = submit_composer(&transport, &mut state, &context());

        assert_eq!(result, Err(SendError::Busy));
        assert_eq!(transport.frames.borrow().len(), 1);
    }

    #[test]
    fn transport_refusal_marks_placeholder_failed() {
        let transport = StubTransport::refusing();
        let mut state = connected_state();
        type_text(&mut state, "Hello");

        let result = submit_composer(&transport, &mut state, &context());

        assert_eq!(result, Err(SendError::Transport));
        // Decision (b) for the post-insert case: the bubble stays, marked failed.
        assert_eq!(state.transcript().messages().len(), 1);
        assert_eq!(
            state.transcript().messages()[0].delivery,
            DeliveryState::Failed
        );
        assert!(state.outbox().is_empty());
    }

    #[test]
    fn attachment_submit_hands_job_to_worker_and_keeps_text() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("receipt.pdf");
        std::fs::File::create(&path)
            .and_then(|mut file| file.write_all(b"%PDF-1.4"))
            .expect("fixture file must be written");

        let transport = StubTransport::default();
        let mut state = connected_state();
        attach_file(&mut state, path, 10 * 1024 * 1024).expect("attach must pass");
        type_text(&mut state, "here you go");

        let result = submit_composer(&transport, &mut state, &context());

        assert_eq!(result, Ok(Submission::Attachment));
        let jobs = transport.jobs.borrow();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].file_name, "receipt.pdf");
        assert_eq!(jobs[0].mime_type, "application/pdf");
        assert_eq!(jobs[0].content.as_deref(), Some("here you go"));
        // Text survives until the AttachmentSent event confirms the send.
        assert_eq!(state.composer().text(), "here you go");
        assert!(state.composer().is_busy());
        assert!(state.composer().attachment().is_none());
        // No frame yet: it is built by the worker after the upload response.
        assert!(transport.frames.borrow().is_empty());
    }

    #[test]
    fn attachment_without_text_sends_no_content() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"png-bytes").expect("fixture file must be written");

        let transport = StubTransport::default();
        let mut state = connected_state();
        attach_file(&mut state, path, 10 * 1024 * 1024).expect("attach must pass");

        submit_composer(&transport, &mut state, &context()).expect("submit must pass");

        assert_eq!(transport.jobs.borrow()[0].content, None);
    }

    #[test]
    fn oversized_file_is_rejected_at_attach_time() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 2048]).expect("fixture file must be written");

        let mut state = connected_state();
        type_text(&mut state, "keep me");

        let result = attach_file(&mut state, path, 1024);

        assert_eq!(
            result,
            Err(AttachError::TooLarge {
                size: 2048,
                max: 1024,
            })
        );
        assert!(state.composer().attachment().is_none());
        // The composer text is untouched by the rejection.
        assert_eq!(state.composer().text(), "keep me");
    }

    #[test]
    fn attaching_a_directory_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir must be created");

        let mut state = connected_state();
        let result = attach_file(&mut state, dir.path().to_path_buf(), 1024);

        assert_eq!(result, Err(AttachError::NotAFile));
    }

    #[test]
    fn new_selection_overwrites_the_pending_attachment() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        std::fs::write(&first, b"a").expect("fixture file must be written");
        std::fs::write(&second, b"b").expect("fixture file must be written");

        let mut state = connected_state();
        attach_file(&mut state, first, 1024).expect("attach must pass");
        attach_file(&mut state, second, 1024).expect("attach must pass");

        assert_eq!(
            state.composer().attachment().map(|a| a.file_name.clone()),
            Some("second.png".to_owned())
        );
    }

    #[test]
    fn missing_attachment_file_fails_the_submit_and_discards_the_slot() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("ghost.png");
        std::fs::write(&path, b"x").expect("fixture file must be written");

        let transport = StubTransport::default();
        let mut state = connected_state();
        attach_file(&mut state, path.clone(), 1024).expect("attach must pass");
        std::fs::remove_file(&path).expect("fixture file must be removable");

        let result = submit_composer(&transport, &mut state, &context());

        assert!(matches!(result, Err(SendError::AttachmentRead(_))));
        assert!(state.composer().attachment().is_none());
        assert!(transport.jobs.borrow().is_empty());
    }
}
