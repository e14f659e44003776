use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Terminal event source: keys, focus changes, and timer ticks.
///
/// A poll timeout with no pending event becomes a [`AppEvent::Tick`] so the
/// shell keeps expiring toasts and cooldowns while the user is idle.
#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::FocusGained => Ok(Some(AppEvent::FocusChanged(true))),
            Event::FocusLost => Ok(Some(AppEvent::FocusChanged(false))),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return Ok(None);
                }

                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

                if key.code == KeyCode::Esc || (key.code == KeyCode::Char('c') && ctrl) {
                    return Ok(Some(AppEvent::QuitRequested));
                }

                let named = match key.code {
                    KeyCode::Enter => Some("enter"),
                    KeyCode::Backspace => Some("backspace"),
                    KeyCode::Delete => Some("delete"),
                    KeyCode::Left => Some("left"),
                    KeyCode::Right => Some("right"),
                    KeyCode::Home => Some("home"),
                    KeyCode::End => Some("end"),
                    _ => None,
                };

                if let Some(name) = named {
                    return Ok(Some(AppEvent::InputKey(KeyInput::new(name, ctrl))));
                }

                if let KeyCode::Char(ch) = key.code {
                    return Ok(Some(AppEvent::InputKey(KeyInput::new(
                        ch.to_string(),
                        ctrl,
                    ))));
                }

                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
