use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::domain::{
    shell_state::ShellState,
    toast::{Toast, ToastKind},
    transcript::TranscriptUiState,
};

use super::composer_input::render_composer;
use super::message_rendering::{build_message_list_elements, element_to_list_item};
use super::styles;

pub fn render(frame: &mut Frame<'_>, state: &ShellState) {
    let toast_height = if state.toast().is_some() { 1 } else { 0 };

    let [transcript_area, toast_area, composer_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(toast_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_transcript_panel(frame, transcript_area, state);

    if let Some(toast) = state.toast() {
        frame.render_widget(Paragraph::new(toast_line(toast)), toast_area);
    }

    render_composer(frame, composer_area, state.composer());

    frame.render_widget(Paragraph::new(status_line(state)), status_area);
}

fn render_transcript_panel(frame: &mut Frame<'_>, area: ratatui::layout::Rect, state: &ShellState) {
    let title = "Support chat";
    let transcript = state.transcript();

    match transcript.ui_state() {
        TranscriptUiState::Empty => {
            render_transcript_message(frame, area, title, "Connecting to support...")
        }
        TranscriptUiState::Loading => {
            render_transcript_message(frame, area, title, "Loading messages...")
        }
        TranscriptUiState::Error => render_transcript_message(
            frame,
            area,
            title,
            "Could not load messages. Check connection.",
        ),
        TranscriptUiState::Ready => {
            if transcript.is_empty() {
                render_transcript_message(
                    frame,
                    area,
                    title,
                    "No messages yet. Start the conversation!",
                );
                return;
            }

            let elements =
                build_message_list_elements(transcript.messages(), Local::now().date_naive());
            let items: Vec<ListItem<'static>> =
                elements.iter().map(element_to_list_item).collect();
            let last_index = items.len().saturating_sub(1);

            let list =
                List::new(items).block(Block::default().title(title).borders(Borders::ALL));

            // Pin the viewport to the newest message.
            let mut list_state = ListState::default();
            list_state.select(Some(last_index));
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn render_transcript_message(
    frame: &mut Frame<'_>,
    area: ratatui::layout::Rect,
    title: &str,
    message: &str,
) {
    let panel =
        Paragraph::new(message).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn toast_line(toast: &Toast) -> Line<'static> {
    let style = match toast.kind {
        ToastKind::Error => styles::toast_error_style(),
        ToastKind::Info => styles::toast_info_style(),
    };
    Line::from(vec![Span::styled(toast.text.clone(), style)])
}

fn status_line(state: &ShellState) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(
        "status: {}",
        state.connection().as_label()
    ))];

    if let Some(label) = state.unread().display_label() {
        spans.push(Span::raw(" | unread: "));
        spans.push(Span::styled(label, styles::unread_count_style()));
    }

    spans.push(Span::raw(
        " | Enter: send | /attach <path> | /detach | Esc: quit",
    ));

    Line::from(spans)
}
