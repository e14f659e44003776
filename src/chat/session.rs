//! Chat session worker: a dedicated thread running a tokio runtime that
//! owns the socket, so the TUI thread never blocks on the network.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    domain::events::{ConnectionState, SessionEvent},
    infra::{config::AppConfig, error::AppError},
    usecases::contracts::{ChatTransport, TransportError},
};

use super::{
    connection,
    endpoint::{chat_socket_url, upload_url},
    frames::ClientFrame,
    upload::UploadJob,
};

const SESSION_SHUTDOWN_FAILED: &str = "CHAT_SESSION_SHUTDOWN_FAILED";

/// Everything the worker needs to run one customer session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub socket_url: String,
    pub upload_url: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub csrf_token: String,
    pub session_cookie: Option<String>,
    pub reconnect_delay: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            socket_url: chat_socket_url(&config.server.base_url, config.customer.id)?,
            upload_url: upload_url(&config.server.base_url),
            customer_id: config.customer.id,
            customer_name: config.customer.name.clone(),
            csrf_token: config.customer.csrf_token.clone(),
            session_cookie: config.customer.session_cookie.clone(),
            reconnect_delay: Duration::from_millis(config.chat.reconnect_delay_ms),
        })
    }
}

/// Commands accepted by the session worker.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    SendFrame(ClientFrame),
    SendAttachment(UploadJob),
    Shutdown,
}

/// Clonable event channel toward the UI thread. Delivery failures mean the
/// UI is gone, so they are logged and ignored.
#[derive(Debug, Clone)]
pub(super) struct EventSender(Sender<SessionEvent>);

impl EventSender {
    pub(super) fn new(sender: Sender<SessionEvent>) -> Self {
        Self(sender)
    }

    pub(super) fn emit(&self, event: SessionEvent) {
        if self.0.send(event).is_err() {
            tracing::debug!("ui receiver dropped; discarding session event");
        }
    }
}

/// Handle to the running chat session worker.
///
/// Dropping the handle (or calling [`ChatSession::dispose`]) closes the
/// socket, cancels any pending reconnect wait, and joins the worker.
#[derive(Debug)]
pub struct ChatSession {
    commands: tokio::sync::mpsc::UnboundedSender<SessionCommand>,
    worker: Option<JoinHandle<()>>,
}

impl ChatSession {
    pub fn spawn(settings: SessionSettings) -> Result<(Self, Receiver<SessionEvent>), AppError> {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
        let events = EventSender::new(event_tx);

        let worker = thread::Builder::new()
            .name("supchat-chat-session".to_owned())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(error) => {
                        tracing::error!(error = %error, "failed to build chat session runtime");
                        events.emit(SessionEvent::Connection(ConnectionState::Disconnected));
                        return;
                    }
                };

                runtime.block_on(connection::run_session(settings, command_rx, events));
            })
            .map_err(AppError::SessionSpawn)?;

        Ok((
            Self {
                commands: command_tx,
                worker: Some(worker),
            },
            event_rx,
        ))
    }

    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.commands.send(SessionCommand::Shutdown);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!(
                    code = SESSION_SHUTDOWN_FAILED,
                    "chat session worker panicked on shutdown"
                );
            }
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl ChatTransport for ChatSession {
    fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError> {
        self.commands
            .send(SessionCommand::SendFrame(frame))
            .map_err(|_| TransportError::Closed)
    }

    fn send_attachment(&self, job: UploadJob) -> Result<(), TransportError> {
        self.commands
            .send(SessionCommand::SendAttachment(job))
            .map_err(|_| TransportError::Closed)
    }
}
