//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Transcript styles
// =============================================================================

/// Style for message sender name (white, bold).
pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for message time in the transcript panel.
pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message text content.
pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for attachment indicators like [Image], [File].
pub fn message_media_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Style for date separator line.
pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the pending-delivery marker on an unconfirmed send.
pub fn delivery_pending_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the failed-delivery marker.
pub fn delivery_failed_style() -> Style {
    Style::default().fg(Color::Red)
}

/// Style for the read receipt checkmark on outgoing messages.
pub fn delivery_read_style() -> Style {
    Style::default().fg(Color::Green)
}

// =============================================================================
// Status bar and composer styles
// =============================================================================

/// Style for the unread count badge (green).
pub fn unread_count_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Style for the composer prompt symbol.
pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Style for typed composer text.
pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the composer placeholder text.
pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for error toasts.
pub fn toast_error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Style for info toasts.
pub fn toast_info_style() -> Style {
    Style::default().fg(Color::Yellow)
}
