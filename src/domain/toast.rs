use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Info,
}

/// Transient notification line shown above the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    pub fn error(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Error,
            shown_at: now,
        }
    }

    pub fn info(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Info,
            shown_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_DURATION
    }
}
