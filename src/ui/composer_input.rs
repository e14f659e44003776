//! Composer input field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::composer::{BusyState, ComposerState};

use super::styles;

/// Placeholder text shown when the composer is empty.
const PLACEHOLDER_TEXT: &str = "Type a message, /attach <path>, Esc to quit";

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

/// Renders the composer field with its cursor.
pub fn render_composer(frame: &mut Frame<'_>, area: Rect, composer: &ComposerState) {
    let line = build_input_line(composer);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(composer_title(composer))
            .borders(Borders::ALL),
    );

    frame.render_widget(paragraph, area);

    // Cursor sits after the prompt, at the display width of the text before
    // the cursor position (wide characters count double).
    let before_cursor: String = composer
        .text()
        .chars()
        .take(composer.cursor_position())
        .collect();
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(PROMPT_SYMBOL.width() as u16)
        .saturating_add(before_cursor.width().min(u16::MAX as usize) as u16);
    let cursor_y = area.y.saturating_add(1);
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Builds the composer block title, surfacing the busy state and any
/// pending attachment.
fn composer_title(composer: &ComposerState) -> String {
    let mut title = "Message".to_owned();

    if let Some(attachment) = composer.attachment() {
        title.push_str(&format!(" — {} attached", attachment.file_name));
    }

    match composer.busy() {
        BusyState::Idle => {}
        BusyState::Cooldown { .. } => title.push_str(" (sending...)"),
        BusyState::Uploading => title.push_str(" (uploading...)"),
    }

    title
}

fn build_input_line(composer: &ComposerState) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if composer.text().is_empty() {
        Line::from(vec![
            prompt,
            Span::styled(
                PLACEHOLDER_TEXT.to_owned(),
                styles::input_placeholder_style(),
            ),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(composer.text().to_owned(), styles::input_text_style()),
        ])
    }
}
