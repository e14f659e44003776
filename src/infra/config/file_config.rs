use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, ChatConfig, CustomerConfig, LogConfig, ServerConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub server: Option<FileServerConfig>,
    pub customer: Option<FileCustomerConfig>,
    pub chat: Option<FileChatConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }

        if let Some(customer) = self.customer {
            customer.merge_into(&mut config.customer);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub base_url: Option<String>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileCustomerConfig {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
}

impl FileCustomerConfig {
    fn merge_into(self, config: &mut CustomerConfig) {
        if let Some(id) = self.id {
            config.id = id;
        }

        if let Some(name) = self.name {
            config.name = name;
        }

        if let Some(csrf_token) = self.csrf_token {
            config.csrf_token = csrf_token;
        }

        if let Some(session_cookie) = self.session_cookie {
            config.session_cookie = Some(session_cookie);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub reconnect_delay_ms: Option<u64>,
    pub max_attachment_bytes: Option<u64>,
    pub send_cooldown_ms: Option<u64>,
    pub unread_display_cap: Option<u32>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(delay) = self.reconnect_delay_ms {
            config.reconnect_delay_ms = delay;
        }

        if let Some(max) = self.max_attachment_bytes {
            config.max_attachment_bytes = max;
        }

        if let Some(cooldown) = self.send_cooldown_ms {
            config.send_cooldown_ms = cooldown;
        }

        if let Some(cap) = self.unread_display_cap {
            config.unread_display_cap = cap;
        }
    }
}
