use std::path::PathBuf;

use super::{render, LoadOutcome};
use crate::client::{ApiClient, ClientResult};
use crate::render::{render_media, render_units};
use crate::router::{LoadTicket, ViewRouter};
use crate::view::regions;

/// Units grid
pub async fn load_units(
    client: &ApiClient,
    router: &ViewRouter,
    ticket: LoadTicket,
) -> ClientResult<LoadOutcome> {
    let Some(units) = client.units().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };

    Ok(render(router, ticket, |state| {
        state
            .document
            .set_html(regions::UNITS_GRID, render_units(&units));
    })
    .await)
}

/// Media library grid
pub async fn load_media(
    client: &ApiClient,
    router: &ViewRouter,
    ticket: LoadTicket,
) -> ClientResult<LoadOutcome> {
    let Some(media) = client.media().await? else {
        return Ok(LoadOutcome::Unauthenticated);
    };

    Ok(render(router, ticket, |state| {
        state
            .document
            .set_html(regions::MEDIA_GRID, render_media(&media));
    })
    .await)
}

/// Upload `files` one after another, then reload the library once.
///
/// A rejected session stops the sequence; files after it are not sent.
pub async fn upload_media(
    client: &ApiClient,
    router: &ViewRouter,
    files: &[PathBuf],
) -> ClientResult<LoadOutcome> {
    let ticket = router.ticket();

    for (index, path) in files.iter().enumerate() {
        tracing::info!(file = %path.display(), position = index + 1, total = files.len(), "Uploading");
        if client.upload_media(path).await?.is_none() {
            return Ok(LoadOutcome::Unauthenticated);
        }
    }

    load_media(client, router, ticket).await
}
