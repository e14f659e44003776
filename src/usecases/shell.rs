//! Shell orchestrator: routes terminal events and session events into
//! state mutations, delegating the send and receive pipelines.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;

use crate::{
    domain::{
        composer::{parse_composer_action, ComposerAction},
        events::{AppEvent, KeyInput, SessionEvent},
        message::CustomerIdentity,
        shell_state::ShellState,
        toast::Toast,
    },
    infra::config::ChatConfig,
};

use super::{
    contracts::{ChatTransport, ShellOrchestrator},
    receive, send_message,
    send_message::{SendContext, SendError},
};

/// A text send with no server echo after this long is treated as lost.
const SEND_ECHO_TIMEOUT_SECS: i64 = 30;

pub struct DefaultShellOrchestrator<T: ChatTransport> {
    state: ShellState,
    transport: T,
    identity: CustomerIdentity,
    chat: ChatConfig,
}

impl<T: ChatTransport> DefaultShellOrchestrator<T> {
    pub fn new(transport: T, identity: CustomerIdentity, chat: ChatConfig) -> Self {
        Self {
            state: ShellState::new(chat.unread_display_cap),
            transport,
            identity,
            chat,
        }
    }

    fn handle_key(&mut self, input: KeyInput) {
        if input.ctrl && input.key == "c" {
            self.state.stop();
            return;
        }

        match input.key.as_str() {
            "enter" => self.handle_enter(),
            "backspace" => self.state.composer_mut().delete_char_before(),
            "delete" => self.state.composer_mut().delete_char_at(),
            "left" => self.state.composer_mut().move_cursor_left(),
            "right" => self.state.composer_mut().move_cursor_right(),
            "home" => self.state.composer_mut().move_cursor_home(),
            "end" => self.state.composer_mut().move_cursor_end(),
            key => {
                let mut chars = key.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    self.state.composer_mut().insert_char(ch);
                }
            }
        }
    }

    fn handle_enter(&mut self) {
        match parse_composer_action(self.state.composer().text()) {
            ComposerAction::Attach(path) => {
                let result =
                    send_message::attach_file(&mut self.state, path, self.chat.max_attachment_bytes);
                self.state.composer_mut().clear_text();
                match result {
                    Ok(()) => {
                        let name = self
                            .state
                            .composer()
                            .attachment()
                            .map(|attachment| attachment.file_name.clone())
                            .unwrap_or_default();
                        self.state
                            .show_toast(Toast::info(format!("Attached {name}"), Instant::now()));
                    }
                    Err(error) => {
                        self.state
                            .show_toast(Toast::error(error.user_message(), Instant::now()));
                    }
                }
            }
            ComposerAction::Detach => {
                self.state.composer_mut().clear_attachment();
                self.state.composer_mut().clear_text();
            }
            ComposerAction::Submit => self.submit(),
        }
    }

    fn submit(&mut self) {
        let context = SendContext {
            identity: self.identity.clone(),
            max_attachment_bytes: self.chat.max_attachment_bytes,
            send_cooldown: Duration::from_millis(self.chat.send_cooldown_ms),
            now: Utc::now(),
            clock: Instant::now(),
        };

        match send_message::submit_composer(&self.transport, &mut self.state, &context) {
            Ok(_) => {}
            // Silent no-ops: nothing to send, or the control is disabled.
            Err(SendError::Empty | SendError::Busy) => {}
            Err(error) => {
                if let Some(text) = error.user_message() {
                    self.state.show_toast(Toast::error(text, Instant::now()));
                }
            }
        }
    }
}

impl<T: ChatTransport> ShellOrchestrator for DefaultShellOrchestrator<T> {
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {
                let now = Instant::now();
                self.state.composer_mut().tick(now);
                self.state.expire_toast(now);

                let stale = self.state.outbox_mut().expire(
                    Utc::now(),
                    chrono::Duration::seconds(SEND_ECHO_TIMEOUT_SECS),
                );
                for temp_id in stale {
                    tracing::warn!(temp_id, "send confirmation timed out");
                    self.state.transcript_mut().mark_failed(&temp_id);
                }
            }
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::FocusChanged(focused) => self.state.set_chat_visible(focused),
            AppEvent::InputKey(input) => self.handle_key(input),
        }
        Ok(())
    }

    fn handle_session_event(&mut self, event: SessionEvent) -> Result<()> {
        receive::apply_session_event(&self.transport, &mut self.state, event, Instant::now());
        Ok(())
    }
}
