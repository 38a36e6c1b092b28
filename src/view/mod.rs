//! View Surface
//!
//! In-memory stand-in for the admin panel's DOM: named regions holding text
//! or rendered markup, form inputs, the active page, plus the alerts and
//! preview windows the operator has been shown.

use std::collections::BTreeMap;

use crate::router::Page;

/// Region and input ids used by the panel
pub mod regions {
    pub const TOTAL_REVENUE: &str = "total-revenue";
    pub const NEW_LEADS: &str = "new-leads";
    pub const AVAILABLE_UNITS: &str = "available-units";
    pub const ACTIVE_CHATS: &str = "active-chats";
    pub const ACTIVITY_LIST: &str = "activity-list";

    pub const TELEGRAM_CHATS: &str = "telegram-chats";
    pub const WEBSITE_CHATS: &str = "website-chats";
    pub const TELEGRAM_MESSAGES: &str = "telegram-messages";
    pub const WEBSITE_MESSAGES: &str = "website-messages";
    pub const TELEGRAM_INPUT: &str = "telegram-input";
    pub const WEBSITE_INPUT: &str = "website-input";

    pub const UNITS_GRID: &str = "units-grid";
    pub const MEDIA_GRID: &str = "media-grid";

    pub const PAGE_SELECTOR: &str = "page-selector";
}

/// Content of one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Text(String),
    Html(String),
}

/// The rendered state of the panel
#[derive(Debug, Clone, Default)]
pub struct Document {
    active_page: Option<Page>,
    regions: BTreeMap<String, Region>,
    inputs: BTreeMap<String, String>,
    alerts: Vec<String>,
    previews: Vec<String>,
}

impl Document {
    pub fn new(initial: Page) -> Self {
        Self {
            active_page: Some(initial),
            ..Self::default()
        }
    }

    pub fn active_page(&self) -> Option<Page> {
        self.active_page
    }

    /// Make `page` the only active page, returning the one it replaced
    pub fn activate(&mut self, page: Page) -> Option<Page> {
        self.active_page.replace(page)
    }

    /// Replace a region with plain text
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.regions.insert(id.to_string(), Region::Text(text.into()));
    }

    /// Replace a region with markup
    pub fn set_html(&mut self, id: &str, html: impl Into<String>) {
        self.regions.insert(id.to_string(), Region::Html(html.into()));
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.regions.get(id)? {
            Region::Text(text) => Some(text),
            Region::Html(_) => None,
        }
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        match self.regions.get(id)? {
            Region::Html(html) => Some(html),
            Region::Text(_) => None,
        }
    }

    pub fn input(&self, id: &str) -> &str {
        self.inputs.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set_input(&mut self, id: &str, value: impl Into<String>) {
        self.inputs.insert(id.to_string(), value.into());
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Open a new viewing context showing `html`
    pub fn open_preview(&mut self, html: impl Into<String>) {
        self.previews.push(html.into());
    }

    pub fn previews(&self) -> &[String] {
        &self.previews
    }
}
