//! Admin Application
//!
//! Wires the session, API client, view router and page editor together and
//! exposes the operator actions of the panel. A rejected session anywhere
//! sends the whole application back to its logged-out entry state.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::client::{ApiClient, ClientError, ClientResult};
use crate::config::{Config, ConfigError};
use crate::editor::{EditorAdapter, EditorOptions};
use crate::models::{ChatSource, PageContent, SitePage};
use crate::pages::{self, LoadOutcome};
use crate::router::{Page, RouteError, ViewRouter};
use crate::session::{FileTokenStore, Session, SessionError};
use crate::view::{regions, Document};

/// Shown after a successful save
pub const SAVED_ALERT: &str = "تم الحفظ بنجاح!";
/// Shown after a successful publish
pub const PUBLISHED_ALERT: &str = "تم النشر بنجاح!";
/// Shown when the backend refuses the credentials
pub const INVALID_CREDENTIALS_ALERT: &str = "Invalid credentials";

/// Operator credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Source of credentials when no session is stored
pub trait CredentialPrompt: Send + Sync {
    fn credentials(&self) -> Result<Credentials, AppError>;
}

pub struct AdminApp {
    session: Arc<Session>,
    client: ApiClient,
    router: ViewRouter,
    editor: Mutex<EditorAdapter>,
    default_slug: String,
}

impl AdminApp {
    pub fn new(client: ApiClient, editor: EditorAdapter, default_slug: impl Into<String>) -> Self {
        Self {
            session: Arc::clone(client.session()),
            client,
            router: ViewRouter::new(Page::Dashboard),
            editor: Mutex::new(editor),
            default_slug: default_slug.into(),
        }
    }

    /// Build the application from configuration, restoring a stored session
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let store = FileTokenStore::new(&config.session.token_file, &config.session.storage_key);
        let session = Arc::new(Session::load(Arc::new(store)).await?);
        let client = ApiClient::new(&config.api, session)?;
        let editor = EditorAdapter::with_canvas(EditorOptions::from_config(&config.editor));

        tracing::debug!(base_url = %client.base_url(), "Admin application ready");
        Ok(Self::new(client, editor, config.editor.default_slug.clone()))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    /// Copy of the rendered panel
    pub async fn document(&self) -> Document {
        self.router.snapshot().await
    }

    /// Entry flow: log in when no session is stored, then show the dashboard.
    ///
    /// Rejected credentials end the flow with [`AppError::InvalidCredentials`]
    /// after the alert is shown.
    pub async fn start(&self, prompt: &dyn CredentialPrompt) -> Result<LoadOutcome, AppError> {
        if !self.session.is_authenticated().await {
            let credentials = prompt.credentials()?;
            if !self.login(&credentials.username, &credentials.password).await? {
                return Err(AppError::InvalidCredentials);
            }
        }

        self.navigate(Page::Dashboard).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let accepted = self.client.login(username, password).await?;
        if !accepted {
            self.router
                .update(|state| state.document.alert(INVALID_CREDENTIALS_ALERT))
                .await;
        }
        Ok(accepted)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.client.logout().await?;
        self.reload().await;
        Ok(())
    }

    /// Activate `page` and run its loader
    pub async fn navigate(&self, page: Page) -> Result<LoadOutcome, AppError> {
        let ticket = self.router.navigate(page).await;

        let result = match page {
            Page::Dashboard => pages::load_dashboard(&self.client, &self.router, ticket).await,
            Page::Editor => {
                self.editor.lock().await.init();
                Ok(LoadOutcome::Rendered)
            }
            Page::Units => pages::load_units(&self.client, &self.router, ticket).await,
            Page::Media => pages::load_media(&self.client, &self.router, ticket).await,
            Page::Chats => pages::load_chats(&self.client, &self.router, ticket).await,
        };
        self.settle(result).await
    }

    /// Navigate by nav key
    pub async fn navigate_to(&self, key: &str) -> Result<LoadOutcome, AppError> {
        let page: Page = key.parse()?;
        self.navigate(page).await
    }

    pub async fn select_chat(
        &self,
        source: ChatSource,
        chat_id: &str,
    ) -> Result<LoadOutcome, AppError> {
        let ticket = self.router.ticket();
        let result = pages::select_chat(&self.client, &self.router, ticket, source, chat_id).await;
        self.settle(result).await
    }

    /// Type into a form input
    pub async fn set_input(&self, id: &str, value: impl Into<String>) {
        let value = value.into();
        self.router
            .update(|state| state.document.set_input(id, value))
            .await;
    }

    /// Send the drafted reply of `source` to its selected chat
    pub async fn send_message(&self, source: ChatSource) -> Result<LoadOutcome, AppError> {
        let result = pages::send_message(&self.client, &self.router, source).await;
        self.settle(result).await
    }

    pub async fn upload_media(&self, files: &[PathBuf]) -> Result<LoadOutcome, AppError> {
        let result = pages::upload_media(&self.client, &self.router, files).await;
        self.settle(result).await
    }

    /// Pages stored in the CMS
    pub async fn list_pages(&self) -> Result<Option<Vec<SitePage>>, AppError> {
        let pages = self.client.pages().await?;
        if pages.is_none() {
            self.reload().await;
        }
        Ok(pages)
    }

    /// Replace the editor canvas, initializing the editor when needed
    pub async fn edit_page(&self, content: &PageContent) {
        let mut editor = self.editor.lock().await;
        editor.init();
        if let Some(builder) = editor.builder_mut() {
            builder.load(content);
        }
    }

    /// Current canvas markup and stylesheet
    pub async fn canvas(&self) -> Option<PageContent> {
        let editor = self.editor.lock().await;
        editor.builder().map(|builder| PageContent {
            html: builder.html(),
            css: builder.css(),
        })
    }

    /// Drop a palette block onto the canvas; false when unknown or uninitialized
    pub async fn drop_block(&self, id: &str) -> bool {
        let mut editor = self.editor.lock().await;
        match editor.builder_mut() {
            Some(builder) => builder.drop_block(id),
            None => false,
        }
    }

    /// Load a stored page into the editor
    pub async fn open_page(&self, slug: &str) -> Result<LoadOutcome, AppError> {
        let ticket = self.router.navigate(Page::Editor).await;
        self.editor.lock().await.init();

        let page = match self.client.page(slug).await {
            Ok(Some(page)) => page,
            other => return self.settle(other.map(|_| LoadOutcome::Unauthenticated)).await,
        };

        // Canvas stays locked across the commit so a stale fetch never lands
        let mut editor = self.editor.lock().await;
        let committed = self
            .router
            .commit(ticket, |state| {
                state.document.set_input(regions::PAGE_SELECTOR, page.slug.clone())
            })
            .await;
        if !committed {
            tracing::debug!(slug = %slug, "Page load superseded");
            return Ok(LoadOutcome::Superseded);
        }

        editor.init();
        if let Some(builder) = editor.builder_mut() {
            builder.load(&page.content);
        }
        Ok(LoadOutcome::Rendered)
    }

    /// Save the canvas as a draft under the selected slug
    pub async fn save_page(&self) -> Result<LoadOutcome, AppError> {
        self.submit_page(false, SAVED_ALERT).await
    }

    /// Save the canvas as the published version of the selected slug
    pub async fn publish_page(&self) -> Result<LoadOutcome, AppError> {
        self.submit_page(true, PUBLISHED_ALERT).await
    }

    /// Open the standalone rendering of the canvas without saving
    pub async fn preview_page(&self) -> Result<Option<String>, AppError> {
        let Some(html) = self.editor.lock().await.preview() else {
            return Ok(None);
        };

        self.router
            .update(|state| state.document.open_preview(html.clone()))
            .await;
        Ok(Some(html))
    }

    async fn selected_slug(&self) -> String {
        let selected = self
            .router
            .read(|state| state.document.input(regions::PAGE_SELECTOR).trim().to_string())
            .await;
        if selected.is_empty() {
            self.default_slug.clone()
        } else {
            selected
        }
    }

    async fn submit_page(&self, publish: bool, success: &str) -> Result<LoadOutcome, AppError> {
        let slug = self.selected_slug().await;
        let Some(page) = self.editor.lock().await.snapshot(&slug, publish) else {
            return Ok(LoadOutcome::Skipped);
        };

        match self.client.save_page(&page).await {
            Ok(Some(_)) => {
                tracing::info!(slug = %page.slug, published = publish, "Page saved");
                self.router
                    .update(|state| state.document.alert(success))
                    .await;
                Ok(LoadOutcome::Rendered)
            }
            Ok(None) => {
                self.reload().await;
                Ok(LoadOutcome::Unauthenticated)
            }
            Err(e) => {
                let message = e.to_string();
                self.router
                    .update(|state| state.document.alert(message))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Reload to the logged-out entry state after an auth failure
    async fn settle(&self, result: ClientResult<LoadOutcome>) -> Result<LoadOutcome, AppError> {
        let outcome = result?;
        if outcome.is_unauthenticated() {
            self.reload().await;
        }
        Ok(outcome)
    }

    async fn reload(&self) {
        tracing::info!("Reloading to entry state");
        self.router.reset().await;
        self.editor.lock().await.reset();
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Credential entry failed: {0}")]
    Prompt(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockReply, RecordedRequest};
    use serde_json::json;
    use std::time::Duration;

    struct FixedPrompt;

    impl CredentialPrompt for FixedPrompt {
        fn credentials(&self) -> Result<Credentials, AppError> {
            Ok(Credentials {
                username: "admin".to_string(),
                password: "secret".to_string(),
            })
        }
    }

    struct WrongPrompt;

    impl CredentialPrompt for WrongPrompt {
        fn credentials(&self) -> Result<Credentials, AppError> {
            Ok(Credentials {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            })
        }
    }

    async fn app(backend: &MockBackend, token: Option<&str>) -> AdminApp {
        let (client, _session) = backend.client(token).await;
        AdminApp::new(
            client,
            EditorAdapter::with_canvas(EditorOptions::default()),
            "home",
        )
    }

    fn cms(request: &RecordedRequest) -> MockReply {
        match request.path.as_str() {
            "/api/auth/login" => {
                let body = request.json();
                if body["password"] == "secret" {
                    MockReply::json(json!({"access_token": "fresh", "token_type": "bearer"}))
                } else {
                    MockReply::unauthorized()
                }
            }
            "/api/stats" => MockReply::json(json!({"revenue": 1000, "leads": 5, "units": 12, "chats": 3})),
            "/api/chats" => MockReply::json(json!({"telegram": [], "website": []})),
            "/api/activity" => MockReply::json(json!([])),
            "/api/pages" => MockReply::json(json!({"status": "saved"})),
            "/api/pages/offers" => MockReply::json(json!({
                "slug": "offers", "content": {"html": "<h2>عروض</h2>", "css": "h2{}"}, "is_published": true
            })),
            _ => MockReply::json(json!({})),
        }
    }

    #[tokio::test]
    async fn test_start_logs_in_and_shows_stats_verbatim() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, None).await;

        let outcome = app.start(&FixedPrompt).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Rendered);
        assert_eq!(app.session().token().await.as_deref(), Some("fresh"));

        let doc = app.document().await;
        assert_eq!(doc.text(regions::TOTAL_REVENUE), Some("1000"));
        assert_eq!(doc.text(regions::NEW_LEADS), Some("5"));
        assert_eq!(doc.text(regions::AVAILABLE_UNITS), Some("12"));
        assert_eq!(doc.text(regions::ACTIVE_CHATS), Some("3"));

        let requests = backend.requests();
        assert_eq!(requests[0].authorization(), None);
        assert_eq!(requests[1].authorization(), Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_alert() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, None).await;

        assert!(!app.login("admin", "wrong").await.unwrap());
        assert_eq!(app.document().await.alerts(), [INVALID_CREDENTIALS_ALERT]);
        assert!(!app.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_start_with_rejected_credentials_is_not_a_session_expiry() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, None).await;

        let result = app.start(&WrongPrompt).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        assert_eq!(app.document().await.alerts(), [INVALID_CREDENTIALS_ALERT]);
        assert_eq!(backend.labels(), vec!["POST /api/auth/login"]);
        assert!(!app.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_rejected_session_reloads_from_any_page() {
        for page in [Page::Units, Page::Media, Page::Chats, Page::Dashboard] {
            let backend = MockBackend::start(|request| {
                if request.authorization() == Some("Bearer old") {
                    MockReply::unauthorized()
                } else {
                    MockReply::json(json!({}))
                }
            })
            .await;
            let app = app(&backend, Some("old")).await;
            app.navigate(Page::Editor).await.unwrap();
            app.set_input(regions::TELEGRAM_INPUT, "draft").await;

            let outcome = app.navigate(page).await.unwrap();
            assert_eq!(outcome, LoadOutcome::Unauthenticated);
            assert!(!app.session().is_authenticated().await);

            let doc = app.document().await;
            assert_eq!(doc.active_page(), Some(Page::Dashboard));
            assert_eq!(doc.input(regions::TELEGRAM_INPUT), "");
            assert_eq!(app.save_page().await.unwrap(), LoadOutcome::Skipped);

            app.navigate(Page::Units).await.unwrap();
            let last = backend.requests().pop().unwrap();
            assert_eq!(last.authorization(), None);
        }
    }

    #[tokio::test]
    async fn test_save_before_editor_init_sends_nothing() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        assert_eq!(app.save_page().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(app.publish_page().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(app.preview_page().await.unwrap(), None);
        assert!(backend.requests().is_empty());
        assert!(app.document().await.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_save_submits_draft_under_selected_slug() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        app.navigate(Page::Editor).await.unwrap();
        app.edit_page(&PageContent {
            html: "<h1>كيان</h1>".to_string(),
            css: "h1{color:gold}".to_string(),
        })
        .await;
        app.set_input(regions::PAGE_SELECTOR, "calculator").await;

        assert_eq!(app.save_page().await.unwrap(), LoadOutcome::Rendered);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].json(),
            json!({
                "slug": "calculator",
                "content": {"html": "<h1>كيان</h1>", "css": "h1{color:gold}"},
                "is_published": false
            })
        );
        assert_eq!(app.document().await.alerts(), [SAVED_ALERT]);
    }

    #[tokio::test]
    async fn test_publish_submits_once_with_published_flag() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        app.navigate(Page::Editor).await.unwrap();
        assert_eq!(app.publish_page().await.unwrap(), LoadOutcome::Rendered);

        assert_eq!(backend.count("POST /api/pages"), 1);
        let body = backend.requests()[0].json();
        assert_eq!(body["is_published"], json!(true));
        assert_eq!(body["slug"], json!("home"));
        assert_eq!(app.document().await.alerts(), [PUBLISHED_ALERT]);
    }

    #[tokio::test]
    async fn test_failed_save_is_alerted_and_returned() {
        let backend = MockBackend::start(|_| MockReply::status(500)).await;
        let app = app(&backend, Some("tok")).await;

        app.navigate(Page::Editor).await.unwrap();
        let result = app.save_page().await;

        assert!(matches!(result, Err(AppError::Client(ClientError::Api { status: 500, .. }))));
        let alerts = app.document().await.alerts().to_vec();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("500"));
    }

    #[tokio::test]
    async fn test_preview_opens_without_request() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        app.navigate(Page::Editor).await.unwrap();
        app.edit_page(&PageContent {
            html: "<p>معاينة</p>".to_string(),
            css: String::new(),
        })
        .await;
        assert!(app.drop_block("unit-selector").await);

        let html = app.preview_page().await.unwrap().unwrap();
        assert!(html.contains("<p>معاينة</p><div class=\"unit-selector\">"));
        assert_eq!(app.document().await.previews(), [html]);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_open_page_loads_canvas() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        assert_eq!(app.open_page("offers").await.unwrap(), LoadOutcome::Rendered);
        assert_eq!(app.document().await.input(regions::PAGE_SELECTOR), "offers");
        assert_eq!(app.document().await.active_page(), Some(Page::Editor));
        assert_eq!(app.canvas().await.unwrap().css, "h2{}");

        app.save_page().await.unwrap();
        let body = backend.requests()[1].json();
        assert_eq!(body["slug"], json!("offers"));
        assert_eq!(body["content"]["html"], json!("<h2>عروض</h2>"));
    }

    #[tokio::test]
    async fn test_open_page_superseded_keeps_canvas() {
        let backend = MockBackend::start(|request| {
            let reply = cms(request);
            if request.path == "/api/pages/offers" {
                reply.delayed(Duration::from_millis(50))
            } else {
                reply
            }
        })
        .await;
        let app = app(&backend, Some("tok")).await;
        app.navigate(Page::Editor).await.unwrap();
        app.edit_page(&PageContent {
            html: "<p>draft</p>".to_string(),
            css: String::new(),
        })
        .await;

        let (opened, units) = tokio::join!(app.open_page("offers"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.navigate(Page::Units).await
        });

        assert_eq!(opened.unwrap(), LoadOutcome::Superseded);
        assert_eq!(units.unwrap(), LoadOutcome::Rendered);
        assert_eq!(app.canvas().await.unwrap().html, "<p>draft</p>");

        let doc = app.document().await;
        assert_eq!(doc.active_page(), Some(Page::Units));
        assert_eq!(doc.input(regions::PAGE_SELECTOR), "");
    }

    #[tokio::test]
    async fn test_unknown_nav_key_is_rejected() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        assert!(matches!(
            app.navigate_to("settings").await,
            Err(AppError::Route(RouteError::UnknownPage(_)))
        ));
        assert_eq!(app.navigate_to("units").await.unwrap(), LoadOutcome::Rendered);
    }

    #[tokio::test]
    async fn test_logout_resets_panel() {
        let backend = MockBackend::start(cms).await;
        let app = app(&backend, Some("tok")).await;

        app.navigate(Page::Media).await.unwrap();
        app.logout().await.unwrap();

        assert!(!app.session().is_authenticated().await);
        assert_eq!(app.document().await.active_page(), Some(Page::Dashboard));
    }
}
