use super::{render, LoadOutcome};
use crate::client::{ApiClient, ClientResult, SendMessageRequest};
use crate::models::ChatSource;
use crate::render::{render_chat_list, render_thread};
use crate::router::{LoadTicket, ViewRouter};
use crate::view::regions;

fn list_region(source: ChatSource) -> &'static str {
    match source {
        ChatSource::Telegram => regions::TELEGRAM_CHATS,
        ChatSource::Website => regions::WEBSITE_CHATS,
    }
}

/// Region showing the selected chat's thread for `source`
pub fn thread_region(source: ChatSource) -> &'static str {
    match source {
        ChatSource::Telegram => regions::TELEGRAM_MESSAGES,
        ChatSource::Website => regions::WEBSITE_MESSAGES,
    }
}

/// Input box holding the operator's draft reply for `source`
pub fn input_region(source: ChatSource) -> &'static str {
    match source {
        ChatSource::Telegram => regions::TELEGRAM_INPUT,
        ChatSource::Website => regions::WEBSITE_INPUT,
    }
}

/// Both inbox lists
pub async fn load_chats(
    client: &ApiClient,
    router: &ViewRouter,
    ticket: LoadTicket,
) -> ClientResult<LoadOutcome> {
    let Some(chats) = client.chats().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };

    Ok(render(router, ticket, |state| {
        for source in ChatSource::ALL {
            state.document.set_html(
                list_region(source),
                render_chat_list(source, chats.for_source(source)),
            );
        }
    })
    .await)
}

/// Fetch the inbox for `source` and show the thread of `chat_id`
pub async fn select_chat(
    client: &ApiClient,
    router: &ViewRouter,
    ticket: LoadTicket,
    source: ChatSource,
    chat_id: &str,
) -> ClientResult<LoadOutcome> {
    let Some(chats) = client.chats_by_source(source).await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };
    let selected = chats.into_iter().find(|chat| chat.id == chat_id);
    if selected.is_none() {
        tracing::debug!(source = %source, chat_id = %chat_id, "Selected chat no longer listed");
    }

    Ok(render(router, ticket, |state| {
        let thread = selected.as_ref().map(render_thread).unwrap_or_default();
        state.document.set_html(thread_region(source), thread);
        state.chats.set(source, selected);
    })
    .await)
}

/// Reply to the selected chat of `source` with the drafted input.
///
/// Empty drafts and missing selections are skipped without a request. After
/// the backend accepts the reply, the draft is cleared and only that chat's
/// thread is fetched again.
pub async fn send_message(
    client: &ApiClient,
    router: &ViewRouter,
    source: ChatSource,
) -> ClientResult<LoadOutcome> {
    let ticket = router.ticket();
    let (draft, selected) = router
        .read(|state| {
            (
                state.document.input(input_region(source)).trim().to_string(),
                state
                    .chats
                    .get(source)
                    .map(|chat| (chat.id.clone(), chat.user_id.clone())),
            )
        })
        .await;

    let Some((chat_id, user_id)) = selected else {
        return Ok(LoadOutcome::Skipped);
    };
    if draft.is_empty() {
        return Ok(LoadOutcome::Skipped);
    }

    let request = SendMessageRequest {
        source,
        user_id,
        message: draft,
    };
    if client.send_message(&request).await?.is_none() {
        return Ok(LoadOutcome::Unauthenticated);
    }

    router
        .update(|state| state.document.set_input(input_region(source), ""))
        .await;

    select_chat(client, router, ticket, source, &chat_id).await
}
