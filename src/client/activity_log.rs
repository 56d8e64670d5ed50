use tracing::info;

use super::page::{ElementId, Page};

/// Append-only activity log rendered into the page's `log` container
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and keeps the log scrolled to the newest entry
    pub fn log(&mut self, page: &mut dyn Page, message: impl Into<String>) {
        let message = message.into();
        info!(entry = %message, "Activity");

        page.append_html(ElementId::Log, &render_entry(&message));
        page.scroll_to_bottom(ElementId::Log);
        self.entries.push(message);
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|entry| entry == message)
    }
}

fn render_entry(message: &str) -> String {
    format!("<p>&gt;&nbsp;{}</p>", escape_html(message))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
