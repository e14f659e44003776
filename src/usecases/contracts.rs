use anyhow::Result;
use thiserror::Error;

use crate::{
    chat::{frames::ClientFrame, upload::UploadJob},
    domain::{
        events::{AppEvent, SessionEvent},
        shell_state::ShellState,
    },
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("chat session is closed")]
    Closed,
}

/// Seam between the UI-thread use cases and the chat session worker.
pub trait ChatTransport {
    /// Queues a frame for transmission over the socket.
    fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError>;

    /// Queues an upload-then-send; the frame is built by the worker once
    /// the upload response arrives.
    fn send_attachment(&self, job: UploadJob) -> Result<(), TransportError>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError> {
        (*self).send_frame(frame)
    }

    fn send_attachment(&self, job: UploadJob) -> Result<(), TransportError> {
        (*self).send_attachment(job)
    }
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
    fn handle_session_event(&mut self, event: SessionEvent) -> Result<()>;
}
