//! Transcript rendering logic.
//!
//! Handles visual formatting of the conversation including:
//! - Sender grouping (consecutive messages from same sender show name only once)
//! - Date separators between messages from different days
//! - Attachment indicators and delivery markers

use chrono::{Local, NaiveDate};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::message::{ChatMessage, DeliveryState};

use super::styles;

/// Delivery marker rendered after an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMarker {
    Pending,
    Failed,
    Read,
}

/// Represents a visual element in the transcript list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    /// Date separator line (e.g., "——— Today ———").
    DateSeparator(String),
    /// A message with optional sender display.
    Message {
        time: String,
        sender: Option<String>,
        content: String,
        marker: Option<DeliveryMarker>,
    },
}

/// Builds a list of visual elements from transcript messages.
///
/// Groups consecutive messages from the same sender and inserts date
/// separators. `today` anchors the Today/Yesterday labels.
pub fn build_message_list_elements(
    messages: &[ChatMessage],
    today: NaiveDate,
) -> Vec<MessageListElement> {
    let mut elements = Vec::new();
    let mut prev_date: Option<NaiveDate> = None;
    let mut prev_sender: Option<String> = None;

    for message in messages {
        let local_time = message.timestamp.with_timezone(&Local);
        let msg_date = local_time.date_naive();

        if prev_date != Some(msg_date) {
            elements.push(MessageListElement::DateSeparator(format_date(
                msg_date, today,
            )));
            prev_sender = None;
        }

        let sender_name = effective_sender_name(message);
        let sender = if prev_sender.as_deref() != Some(sender_name.as_str()) {
            Some(sender_name.clone())
        } else {
            None
        };

        elements.push(MessageListElement::Message {
            time: local_time.format("%H:%M").to_string(),
            sender,
            content: message.display_content(),
            marker: delivery_marker(message),
        });

        prev_date = Some(msg_date);
        prev_sender = Some(sender_name);
    }

    elements
}

/// Converts a list element to a ListItem for ratatui rendering.
pub fn element_to_list_item(element: &MessageListElement) -> ListItem<'static> {
    match element {
        MessageListElement::DateSeparator(date) => date_separator_item(date),
        MessageListElement::Message {
            time,
            sender,
            content,
            marker,
        } => message_item(time, sender.as_deref(), content, *marker),
    }
}

fn delivery_marker(message: &ChatMessage) -> Option<DeliveryMarker> {
    if !message.is_outgoing() {
        return None;
    }

    match message.delivery {
        DeliveryState::Pending => Some(DeliveryMarker::Pending),
        DeliveryState::Failed => Some(DeliveryMarker::Failed),
        DeliveryState::Sent if message.read => Some(DeliveryMarker::Read),
        DeliveryState::Sent => None,
    }
}

fn date_separator_item(date: &str) -> ListItem<'static> {
    let separator = format!("——— {} ———", date);
    let line = Line::from(vec![Span::styled(
        separator,
        styles::date_separator_style(),
    )])
    .alignment(Alignment::Center);
    ListItem::new(vec![Line::default(), line, Line::default()])
}

fn message_item(
    time: &str,
    sender: Option<&str>,
    content: &str,
    marker: Option<DeliveryMarker>,
) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>5} ", time),
        styles::message_time_style(),
    )];

    if let Some(name) = sender {
        spans.push(Span::styled(
            format!("{}: ", name),
            styles::message_sender_style(),
        ));
    }

    spans.extend(build_content_spans(content));

    match marker {
        Some(DeliveryMarker::Pending) => spans.push(Span::styled(
            " \u{25CB}".to_owned(), // hollow circle
            styles::delivery_pending_style(),
        )),
        Some(DeliveryMarker::Failed) => spans.push(Span::styled(
            " \u{2717} not sent".to_owned(),
            styles::delivery_failed_style(),
        )),
        Some(DeliveryMarker::Read) => spans.push(Span::styled(
            " \u{2713}".to_owned(),
            styles::delivery_read_style(),
        )),
        None => {}
    }

    ListItem::new(Line::from(spans))
}

/// Builds styled spans for the content, highlighting attachment indicators.
fn build_content_spans(text: &str) -> Vec<Span<'static>> {
    if text.starts_with('[') {
        if let Some(end_bracket) = text.find(']') {
            let media_part = &text[..=end_bracket];
            let rest = text[end_bracket + 1..].trim_start();

            if rest.is_empty() {
                return vec![Span::styled(
                    media_part.to_owned(),
                    styles::message_media_style(),
                )];
            }
            return vec![
                Span::styled(media_part.to_owned(), styles::message_media_style()),
                Span::raw(" ".to_owned()),
                Span::styled(rest.to_owned(), styles::message_text_style()),
            ];
        }
    }

    vec![Span::styled(text.to_owned(), styles::message_text_style())]
}

fn effective_sender_name(message: &ChatMessage) -> String {
    if message.is_outgoing() {
        "You".to_owned()
    } else {
        message.sender_name.clone()
    }
}

fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_owned()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_owned()
    } else {
        date.format("%-d %b %Y").to_string()
    }
}
