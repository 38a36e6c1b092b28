//! # Kayan Admin
//!
//! Operator console for the Kayan Pro real-estate CMS: authenticates against
//! the backend, loads dashboard, chat, unit and media data into an in-memory
//! panel, and drives the page editor that produces the public site's pages.
//!
//! ## Modules
//!
//! - [`session`]: Bearer token store with durable persistence
//! - [`client`]: REST client with uniform auth-failure handling
//! - [`router`]: Page navigation and the UI state it owns
//! - [`pages`]: Per-page data loaders and chat/media actions
//! - [`editor`]: Single-instance page builder adapter
//! - [`app`]: The assembled console
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kayan_admin::{AdminApp, Config, Page};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = AdminApp::from_config(&Config::load_default()).await?;
//!
//!     if app.login("admin", "secret").await? {
//!         app.navigate(Page::Units).await?;
//!         let doc = app.document().await;
//!         println!("{}", doc.html("units-grid").unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod editor;
pub mod models;
pub mod pages;
pub mod render;
pub mod router;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AdminApp, AppError, CredentialPrompt, Credentials};
pub use client::{ApiClient, ClientError, ClientResult, RequestOptions};
pub use config::{Config, ConfigError};
pub use editor::{EditorAdapter, EditorOptions, PageBuilder};
pub use pages::LoadOutcome;
pub use router::{Page, RouteError, ViewRouter};
pub use session::{FileTokenStore, LogoutReason, Session, SessionError, TokenStore};
pub use view::Document;
