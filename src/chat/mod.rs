//! Chat transport layer: WebSocket session, wire frames, and the upload
//! client for attachments.

mod connection;
pub mod endpoint;
pub mod frames;
pub mod session;
pub mod upload;

/// Returns the chat module name for smoke checks.
pub fn module_name() -> &'static str {
    "chat"
}
