//! Typed Resource Calls
//!
//! One method per backend endpoint the console uses. All of them follow
//! `ApiClient::call` semantics: `Ok(None)` means the session was rejected.

use super::{ApiClient, ClientResult, HealthResponse, RequestOptions, SendMessageRequest};
use crate::models::{
    Activity, Chat, ChatSource, ChatsBySource, DashboardStats, MediaAsset, MediaList, PageList,
    SitePage, Unit, UnitList,
};

impl ApiClient {
    /// GET /api/health
    pub async fn health(&self) -> ClientResult<Option<HealthResponse>> {
        self.call("/api/health", RequestOptions::get()).await
    }

    /// GET /api/stats
    pub async fn stats(&self) -> ClientResult<Option<DashboardStats>> {
        self.call("/api/stats", RequestOptions::get()).await
    }

    /// GET /api/activity
    pub async fn activity(&self) -> ClientResult<Option<Vec<Activity>>> {
        self.call("/api/activity", RequestOptions::get()).await
    }

    /// GET /api/chats, grouped by source
    pub async fn chats(&self) -> ClientResult<Option<ChatsBySource>> {
        self.call("/api/chats", RequestOptions::get()).await
    }

    /// GET /api/chats?source=...
    pub async fn chats_by_source(&self, source: ChatSource) -> ClientResult<Option<Vec<Chat>>> {
        let endpoint = format!("/api/chats?source={}", source.as_str());
        self.call(&endpoint, RequestOptions::get()).await
    }

    /// POST /api/chats/send
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> ClientResult<Option<serde_json::Value>> {
        let body = serde_json::to_value(request).map_err(|e| super::ClientError::Decode {
            endpoint: "/api/chats/send".to_string(),
            error: e.to_string(),
        })?;
        self.call("/api/chats/send", RequestOptions::post(body)).await
    }

    /// GET /api/units
    pub async fn units(&self) -> ClientResult<Option<Vec<Unit>>> {
        let list: Option<UnitList> = self.call("/api/units", RequestOptions::get()).await?;
        Ok(list.map(|l| l.units))
    }

    /// GET /api/media
    pub async fn media(&self) -> ClientResult<Option<Vec<MediaAsset>>> {
        let list: Option<MediaList> = self.call("/api/media", RequestOptions::get()).await?;
        Ok(list.map(|l| l.media))
    }

    /// GET /api/pages
    pub async fn pages(&self) -> ClientResult<Option<Vec<SitePage>>> {
        let list: Option<PageList> = self.call("/api/pages", RequestOptions::get()).await?;
        Ok(list.map(|l| l.pages))
    }

    /// GET /api/pages/{slug}
    pub async fn page(&self, slug: &str) -> ClientResult<Option<SitePage>> {
        let endpoint = format!("/api/pages/{}", urlencoding::encode(slug));
        self.call(&endpoint, RequestOptions::get()).await
    }

    /// POST /api/pages
    pub async fn save_page(&self, page: &SitePage) -> ClientResult<Option<serde_json::Value>> {
        let body = serde_json::to_value(page).map_err(|e| super::ClientError::Decode {
            endpoint: "/api/pages".to_string(),
            error: e.to_string(),
        })?;
        self.call("/api/pages", RequestOptions::post(body)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{ChatSource, PageContent, SitePage, UnitCategory};
    use crate::testing::{MockBackend, MockReply};
    use serde_json::json;

    use super::SendMessageRequest;

    #[tokio::test]
    async fn test_resource_paths_and_envelopes() {
        let backend = MockBackend::start(|request| match request.path.as_str() {
            "/api/units" => MockReply::json(json!({"units": [
                {"unit_number": 101, "unit_type": "residential", "area_sqm": 120, "total_price": 850000, "status": "available"}
            ]})),
            "/api/media" => MockReply::json(json!({"media": [
                {"filename": "a.jpg", "file_size": 2048, "thumbnail_url": "https://cdn/a.jpg"}
            ]})),
            "/api/chats" if request.query.is_some() => MockReply::json(json!([
                {"id": "c1", "user_id": "u1", "messages": []}
            ])),
            "/api/pages/about%20us" => MockReply::json(json!({
                "slug": "about us", "content": {"html": "<p>x</p>", "css": ""}, "is_published": true
            })),
            _ => MockReply::json(json!({})),
        })
        .await;
        let (client, _session) = backend.client(Some("tok")).await;

        let units = client.units().await.unwrap().unwrap();
        assert_eq!(units[0].unit_number, "101");
        assert_eq!(units[0].unit_type, UnitCategory::Residential);

        let media = client.media().await.unwrap().unwrap();
        assert_eq!(media[0].size_kb(), "2.00");

        let chats = client.chats_by_source(ChatSource::Website).await.unwrap().unwrap();
        assert_eq!(chats[0].id, "c1");

        let page = client.page("about us").await.unwrap().unwrap();
        assert!(page.is_published);

        assert_eq!(
            backend.labels(),
            vec![
                "GET /api/units",
                "GET /api/media",
                "GET /api/chats?source=website",
                "GET /api/pages/about%20us",
            ]
        );
    }

    #[tokio::test]
    async fn test_post_bodies() {
        let backend = MockBackend::start(|_| MockReply::json(json!({"ok": true}))).await;
        let (client, _session) = backend.client(Some("tok")).await;

        client
            .send_message(&SendMessageRequest {
                source: ChatSource::Telegram,
                user_id: "42".to_string(),
                message: "مرحبا".to_string(),
            })
            .await
            .unwrap();

        client
            .save_page(&SitePage {
                slug: "home".to_string(),
                title: None,
                content: PageContent {
                    html: "<h1>Hi</h1>".to_string(),
                    css: "h1{color:gold}".to_string(),
                },
                is_published: false,
            })
            .await
            .unwrap();

        let requests = backend.requests();
        assert_eq!(
            requests[0].json(),
            json!({"source": "telegram", "user_id": "42", "message": "مرحبا"})
        );
        assert_eq!(
            requests[1].json(),
            json!({"slug": "home", "content": {"html": "<h1>Hi</h1>", "css": "h1{color:gold}"}, "is_published": false})
        );
    }
}
