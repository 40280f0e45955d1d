use std::sync::Arc;

use axum::{extract::State, http::{HeaderMap, StatusCode}};
use client_core::session::Access;

use super::{html, open_session, PageResult};
use crate::{app_state::AppState, views};

pub(crate) async fn show(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let user = session.user()?;

    let (speakers, talks) =
        futures::try_join!(session.backend.list_speakers(), session.backend.list_talks())?;
    let active_speakers = speakers.iter().filter(|s| s.status.is_active()).count();
    let active_talks = talks.iter().filter(|t| t.status.is_active()).count();

    Ok(html(
        StatusCode::OK,
        views::dashboard(user, active_speakers, speakers.len(), active_talks, talks.len()),
    ))
}
