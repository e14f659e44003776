//! Connection manager: the session loop owning the socket.
//!
//! State machine per connection attempt:
//! `Connecting → Connected → Reconnecting → Connecting → …`, with a single
//! fixed-delay reconnect wait per disconnect. Reconnection is unconditional
//! and infinite; only a shutdown command ends the loop.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

use crate::domain::events::{ConnectionState, SessionEvent};

use super::{
    frames::{decode_frame, ClientFrame, ServerFrame},
    session::{EventSender, SessionCommand, SessionSettings},
    upload::{self, UploadJob},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    Closed,
    Shutdown,
}

pub(super) async fn run_session(
    settings: SessionSettings,
    mut commands: tokio::sync::mpsc::UnboundedReceiver<SessionCommand>,
    events: EventSender,
) {
    let http = reqwest::Client::new();

    loop {
        events.emit(SessionEvent::Connection(ConnectionState::Connecting));

        match connect_async(&settings.socket_url).await {
            Ok((stream, _response)) => {
                tracing::info!(url = %settings.socket_url, "chat socket connected");
                events.emit(SessionEvent::Connection(ConnectionState::Connected));

                let exit = run_connected(stream, &settings, &mut commands, &events, &http).await;
                if exit == LoopExit::Shutdown {
                    break;
                }
                tracing::info!("chat socket closed");
            }
            Err(error) => {
                tracing::warn!(error = %error, url = %settings.socket_url, "chat socket connect failed");
            }
        }

        events.emit(SessionEvent::Connection(ConnectionState::Reconnecting));
        if wait_for_reconnect(&settings, &mut commands, &events).await == LoopExit::Shutdown {
            break;
        }
    }

    events.emit(SessionEvent::Connection(ConnectionState::Disconnected));
}

/// One reconnect wait per disconnect; being a single awaited sleep inside
/// one task, a second timer can never be pending at the same time. Send
/// commands arriving while offline are refused, not queued.
async fn wait_for_reconnect(
    settings: &SessionSettings,
    commands: &mut tokio::sync::mpsc::UnboundedReceiver<SessionCommand>,
    events: &EventSender,
) -> LoopExit {
    let delay = tokio::time::sleep(settings.reconnect_delay);
    tokio::pin!(delay);

    loop {
        tokio::select! {
            _ = &mut delay => return LoopExit::Closed,
            command = commands.recv() => match command {
                Some(SessionCommand::SendFrame(frame)) => {
                    events.emit(SessionEvent::SendFailed {
                        temp_id: frame.temp_id().map(ToOwned::to_owned),
                        reason: "chat is not connected".to_owned(),
                    });
                }
                Some(SessionCommand::SendAttachment(_)) => {
                    events.emit(SessionEvent::SendFailed {
                        temp_id: None,
                        reason: "chat is not connected".to_owned(),
                    });
                }
                Some(SessionCommand::Shutdown) | None => return LoopExit::Shutdown,
            },
        }
    }
}

async fn run_connected(
    stream: WsStream,
    settings: &SessionSettings,
    commands: &mut tokio::sync::mpsc::UnboundedReceiver<SessionCommand>,
    events: &EventSender,
    http: &reqwest::Client,
) -> LoopExit {
    let (mut write, mut read) = stream.split();

    // Upload tasks enqueue their follow-up frames here.
    let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    // A fresh connection starts by syncing history and the unread badge.
    for frame in [ClientFrame::GetHistory, ClientFrame::GetUnreadCount] {
        match serde_json::to_string(&frame) {
            Ok(text) => {
                if let Err(error) = write.send(Message::Text(text.into())).await {
                    tracing::warn!(error = %error, "initial sync frame failed");
                    return LoopExit::Closed;
                }
            }
            Err(error) => tracing::error!(error = %error, "frame serialization failed"),
        }
    }

    loop {
        tokio::select! {
            outbound = out_rx.recv() => {
                // out_tx lives in this scope, so recv() cannot yield None.
                if let Some(text) = outbound {
                    if let Err(error) = write.send(Message::Text(text.into())).await {
                        events.emit(SessionEvent::SendFailed {
                            temp_id: None,
                            reason: error.to_string(),
                        });
                        return LoopExit::Closed;
                    }
                }
            }
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => dispatch(text.as_str(), events),
                Some(Ok(Message::Close(_))) | None => return LoopExit::Closed,
                Some(Ok(_)) => {} // binary and ping frames handled by the tungstenite layer
                Some(Err(error)) => {
                    // Transport errors are terminal for this connection; the
                    // outer loop handles recovery.
                    tracing::warn!(error = %error, "chat socket error");
                    return LoopExit::Closed;
                }
            },
            command = commands.recv() => match command {
                Some(SessionCommand::SendFrame(frame)) => {
                    let temp_id = frame.temp_id().map(ToOwned::to_owned);
                    match serde_json::to_string(&frame) {
                        Ok(text) => {
                            if let Err(error) = write.send(Message::Text(text.into())).await {
                                events.emit(SessionEvent::SendFailed {
                                    temp_id,
                                    reason: error.to_string(),
                                });
                                return LoopExit::Closed;
                            }
                        }
                        Err(error) => events.emit(SessionEvent::SendFailed {
                            temp_id,
                            reason: error.to_string(),
                        }),
                    }
                }
                Some(SessionCommand::SendAttachment(job)) => {
                    tokio::spawn(upload_and_send(
                        http.clone(),
                        settings.clone(),
                        job,
                        out_tx.clone(),
                        events.clone(),
                    ));
                }
                Some(SessionCommand::Shutdown) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    return LoopExit::Shutdown;
                }
            },
        }
    }
}

/// Routes one inbound frame to the UI thread.
fn dispatch(text: &str, events: &EventSender) {
    let Some(frame) = decode_frame(text) else {
        return;
    };

    match frame {
        ServerFrame::ChatMessage { message } => {
            events.emit(SessionEvent::MessageReceived(message.into_domain()));
        }
        ServerFrame::ChatHistory { messages } => {
            let history = messages
                .into_iter()
                .map(|message| message.into_domain())
                .collect();
            events.emit(SessionEvent::HistoryLoaded(history));
        }
        ServerFrame::MessageRead { message_id } => {
            events.emit(SessionEvent::MessageRead { message_id });
        }
        ServerFrame::UnreadCount { count } => {
            events.emit(SessionEvent::UnreadCount(count));
        }
        ServerFrame::Error { message } => {
            events.emit(SessionEvent::ServerError { message });
        }
        ServerFrame::Unknown => {
            tracing::debug!("ignoring unrecognized frame type");
        }
    }
}

/// Phase two of an attachment send: after a successful upload, the chat
/// frame referencing the file URL goes out over the socket. Exactly one of
/// `AttachmentSent` or `SendFailed` is emitted on every path, so the busy
/// indicator always clears.
async fn upload_and_send(
    http: reqwest::Client,
    settings: SessionSettings,
    job: UploadJob,
    out_tx: tokio::sync::mpsc::UnboundedSender<String>,
    events: EventSender,
) {
    match upload::upload_attachment(&http, &settings, &job).await {
        Ok(file_url) => {
            let frame = ClientFrame::attachment_message(
                job.content.clone(),
                file_url,
                job.mime_type.clone(),
                settings.customer_id,
                settings.customer_name.clone(),
            );

            match serde_json::to_string(&frame) {
                Ok(text) => {
                    if out_tx.send(text).is_err() {
                        events.emit(SessionEvent::SendFailed {
                            temp_id: None,
                            reason: "socket closed during upload".to_owned(),
                        });
                        return;
                    }
                    events.emit(SessionEvent::AttachmentSent);
                }
                Err(error) => events.emit(SessionEvent::SendFailed {
                    temp_id: None,
                    reason: error.to_string(),
                }),
            }
        }
        Err(error) => {
            tracing::warn!(error = %error, "attachment upload failed");
            events.emit(SessionEvent::SendFailed {
                temp_id: None,
                reason: error.to_string(),
            });
        }
    }
}
