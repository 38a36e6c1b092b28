//! Page Data Loaders
//!
//! Each loader fetches its collection, then replaces the target region in
//! full through [`ViewRouter::commit`]. A rejected session leaves the regions
//! untouched and reports [`LoadOutcome::Unauthenticated`]; a render whose
//! ticket went stale is dropped and reported as [`LoadOutcome::Superseded`].

mod catalog;
mod chats;
mod dashboard;

pub use catalog::{load_media, load_units, upload_media};
pub use chats::{input_region, load_chats, select_chat, send_message, thread_region};
pub use dashboard::load_dashboard;

use crate::router::{LoadTicket, UiState, ViewRouter};

/// How a load or action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetched and rendered
    Rendered,
    /// Fetched, but the operator navigated away first
    Superseded,
    /// The backend rejected the session; the session is cleared
    Unauthenticated,
    /// Local validation failed; nothing was sent
    Skipped,
}

impl LoadOutcome {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, LoadOutcome::Unauthenticated)
    }
}

/// Commit a render and map the result to an outcome
async fn render<F>(router: &ViewRouter, ticket: LoadTicket, apply: F) -> LoadOutcome
where
    F: FnOnce(&mut UiState),
{
    if router.commit(ticket, apply).await {
        LoadOutcome::Rendered
    } else {
        LoadOutcome::Superseded
    }
}
