use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub customer: CustomerConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// When set, logs are written here instead of stdout so they do not
    /// corrupt the TUI screen.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Storefront base URL; the chat socket URL is derived from its scheme.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerConfig {
    pub id: i64,
    pub name: String,
    pub csrf_token: String,
    /// Session cookie sent with the upload request when present.
    pub session_cookie: Option<String>,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Customer".to_owned(),
            csrf_token: "replace-me".to_owned(),
            session_cookie: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub reconnect_delay_ms: u64,
    pub max_attachment_bytes: u64,
    pub send_cooldown_ms: u64,
    pub unread_display_cap: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 5_000,
            max_attachment_bytes: 10 * 1024 * 1024,
            send_cooldown_ms: 400,
            unread_display_cap: 99,
        }
    }
}
