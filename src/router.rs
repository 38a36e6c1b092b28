//! View Router
//!
//! Maps navigation keys to pages and owns the panel's UI state.
//!
//! Every navigation bumps a generation counter and hands out a
//! [`LoadTicket`]. Loaders commit renders through [`ViewRouter::commit`],
//! which drops the render when a newer navigation happened in the meantime.
//! Navigation and commit take the same lock, so a stale response can never
//! land after the page it belonged to was left.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{Chat, ChatSource};
use crate::view::Document;

/// Panel pages reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Editor,
    Units,
    Media,
    Chats,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Editor,
        Page::Units,
        Page::Media,
        Page::Chats,
    ];

    /// Navigation key (`data-page` in the panel markup)
    pub fn key(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Editor => "editor",
            Page::Units => "units",
            Page::Media => "media",
            Page::Chats => "chats",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Page {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Page::ALL
            .into_iter()
            .find(|page| page.key() == key)
            .ok_or_else(|| RouteError::UnknownPage(s.to_string()))
    }
}

/// Currently selected chat, one per inbox
#[derive(Debug, Clone, Default)]
pub struct ChatSelection {
    telegram: Option<Chat>,
    website: Option<Chat>,
}

impl ChatSelection {
    pub fn get(&self, source: ChatSource) -> Option<&Chat> {
        match source {
            ChatSource::Telegram => self.telegram.as_ref(),
            ChatSource::Website => self.website.as_ref(),
        }
    }

    pub fn set(&mut self, source: ChatSource, chat: Option<Chat>) {
        match source {
            ChatSource::Telegram => self.telegram = chat,
            ChatSource::Website => self.website = chat,
        }
    }
}

/// Application UI state owned by the router
#[derive(Debug, Clone)]
pub struct UiState {
    pub document: Document,
    pub chats: ChatSelection,
}

impl UiState {
    fn new(initial: Page) -> Self {
        Self {
            document: Document::new(initial),
            chats: ChatSelection::default(),
        }
    }
}

/// Generation a load started under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct ViewRouter {
    initial: Page,
    state: Mutex<UiState>,
    generation: AtomicU64,
}

impl ViewRouter {
    pub fn new(initial: Page) -> Self {
        Self {
            initial,
            state: Mutex::new(UiState::new(initial)),
            generation: AtomicU64::new(0),
        }
    }

    /// Activate `page` and invalidate loads started for earlier pages
    pub async fn navigate(&self, page: Page) -> LoadTicket {
        let mut state = self.state.lock().await;
        let previous = state.document.activate(page);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::debug!(from = ?previous, to = %page, generation, "Navigated");
        LoadTicket { generation }
    }

    /// Ticket for work triggered on the current page
    pub fn ticket(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Apply a render if `ticket` is still current; returns whether it was
    pub async fn commit<F>(&self, ticket: LoadTicket, render: F) -> bool
    where
        F: FnOnce(&mut UiState),
    {
        let mut state = self.state.lock().await;
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "Discarding superseded render");
            return false;
        }
        render(&mut state);
        true
    }

    /// Read the UI state
    pub async fn read<R>(&self, f: impl FnOnce(&UiState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Mutate the UI state outside of a load (inputs, alerts)
    pub async fn update<R>(&self, f: impl FnOnce(&mut UiState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Back to the entry state: fresh document, initial page, no selection
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = UiState::new(self.initial);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> Document {
        self.read(|state| state.document.clone()).await
    }
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Unknown page '{0}'")]
    UnknownPage(String),
}
