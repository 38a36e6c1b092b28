//! HTML Rendering
//!
//! Turns backend collections into region markup. Every backend string is
//! untrusted and goes through [`escape_html`] before it reaches markup.

mod catalog;
mod chats;

pub use catalog::{render_media, render_units, PLACEHOLDER_IMAGE};
pub use chats::{participant_label, render_chat_list, render_thread};

use crate::models::Activity;

/// Escape text for HTML element and attribute contexts
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Recent-activity feed
pub fn render_activity(activities: &[Activity]) -> String {
    activities
        .iter()
        .map(|activity| {
            format!(
                "<div class=\"activity-item\">\
                 <span>{}</span>\
                 <div><strong>{}</strong><p>{}</p><small>{}</small></div>\
                 </div>",
                escape_html(&activity.icon),
                escape_html(&activity.title),
                escape_html(&activity.description),
                escape_html(&activity.time),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="alert('x')"> & more"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt; &amp; more"
        );
        assert_eq!(escape_html("وحدة 12"), "وحدة 12");
    }

    #[test]
    fn test_activity_is_escaped() {
        let html = render_activity(&[Activity {
            icon: "💬".to_string(),
            title: "New lead".to_string(),
            description: "<script>steal()</script>".to_string(),
            time: "5m".to_string(),
        }]);

        assert!(html.contains("<strong>New lead</strong>"));
        assert!(html.contains("&lt;script&gt;steal()&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_activity_renders_nothing() {
        assert_eq!(render_activity(&[]), "");
    }
}
