use super::{render, LoadOutcome};
use crate::client::{ApiClient, ClientResult};
use crate::models::{display_value, ChatSource};
use crate::render::{render_activity, render_chat_list};
use crate::router::{LoadTicket, ViewRouter};
use crate::view::regions;

/// Stats counters, then both chat lists, then the activity feed
pub async fn load_dashboard(
    client: &ApiClient,
    router: &ViewRouter,
    ticket: LoadTicket,
) -> ClientResult<LoadOutcome> {
    let Some(stats) = client.stats().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };
    let outcome = render(router, ticket, |state| {
        let doc = &mut state.document;
        doc.set_text(regions::TOTAL_REVENUE, display_value(&stats.revenue));
        doc.set_text(regions::NEW_LEADS, display_value(&stats.leads));
        doc.set_text(regions::AVAILABLE_UNITS, display_value(&stats.units));
        doc.set_text(regions::ACTIVE_CHATS, display_value(&stats.chats));
    })
    .await;
    if outcome != LoadOutcome::Rendered {
        return Ok(outcome);
    }

    let Some(chats) = client.chats().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };
    let outcome = render(router, ticket, |state| {
        state.document.set_html(
            regions::TELEGRAM_CHATS,
            render_chat_list(ChatSource::Telegram, &chats.telegram),
        );
        state.document.set_html(
            regions::WEBSITE_CHATS,
            render_chat_list(ChatSource::Website, &chats.website),
        );
    })
    .await;
    if outcome != LoadOutcome::Rendered {
        return Ok(outcome);
    }

    let Some(activity) = client.activity().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };
    Ok(render(router, ticket, |state| {
        state
            .document
            .set_html(regions::ACTIVITY_LIST, render_activity(&activity));
    })
    .await)
}
