//! Chat list and thread markup.

use chrono::{DateTime, NaiveDateTime};

use super::escape_html;
use crate::models::{Chat, ChatSource, MessageOrigin};

/// Name shown for a chat's participant
pub fn participant_label(source: ChatSource, chat: &Chat) -> String {
    match source {
        ChatSource::Telegram => chat
            .user_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| chat.user_id.clone()),
        ChatSource::Website => format!("Visitor #{}", chat.user_id),
    }
}

/// Chat list for one inbox, latest message as preview
pub fn render_chat_list(source: ChatSource, chats: &[Chat]) -> String {
    chats
        .iter()
        .map(|chat| {
            let preview = chat.latest_message().map(|m| m.text.as_str()).unwrap_or("");
            format!(
                "<div class=\"chat-item\" data-source=\"{}\" data-chat-id=\"{}\">\
                 <strong>{}</strong><p>{}</p></div>",
                source.as_str(),
                escape_html(&chat.id),
                escape_html(&participant_label(source, chat)),
                escape_html(preview),
            )
        })
        .collect()
}

/// Full message thread of one chat
pub fn render_thread(chat: &Chat) -> String {
    chat.messages
        .iter()
        .map(|message| {
            let class = match message.origin() {
                MessageOrigin::Operator => "admin",
                MessageOrigin::Participant => "user",
            };
            let time = message
                .timestamp
                .as_deref()
                .and_then(short_time)
                .map(|t| format!("<small>{}</small>", t))
                .unwrap_or_default();

            format!(
                "<div class=\"message {}\">{}{}</div>",
                class,
                escape_html(&message.text),
                time
            )
        })
        .collect()
}

/// `HH:MM` from an RFC 3339 or naive ISO timestamp
fn short_time(timestamp: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.format("%H:%M").to_string());
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.format("%H:%M").to_string())
}
