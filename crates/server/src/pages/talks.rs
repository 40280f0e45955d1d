use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use client_core::{session::Access, ClientResult};
use console_core::{
    delete_flow::confirm_delete,
    forms::TalkForm,
    orchestrator::submit,
    page::Page,
    store::{DeleteModal, TalkFormState},
    NavigationHub, Route, SubmitOutcome,
};
use shared::domain::{Room, Speaker, TalkId, User};
use url::form_urlencoded;

use super::{
    html, open_session, rerender_status, see_other, ListQuery, PageError, PageResult, Session,
};
use crate::{app_state::AppState, views};

/// Rooms and speakers offered by the talk form, speakers by display name.
async fn form_options(session: &Session) -> ClientResult<(Vec<Room>, Vec<Speaker>)> {
    let (rooms, mut speakers) =
        futures::try_join!(session.backend.list_rooms(), session.backend.list_speakers())?;
    speakers.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok((rooms, speakers))
}

async fn render_form(
    session: &Session,
    user: &User,
    action: &str,
    form: &TalkForm,
    store: &TalkFormState,
    status: StatusCode,
) -> PageResult {
    let (rooms, speakers) = form_options(session).await?;
    Ok(html(
        status,
        views::talks::form(user, action, form, &rooms, &speakers, store),
    ))
}

pub(crate) async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let talks = session.backend.list_talks().await?;

    let mut store = TalkFormState::new();
    if let Some(id) = query.delete.filter(|id| !id.is_empty()) {
        store.open_delete_modal(TalkId::new(id));
    }
    Ok(html(
        StatusCode::OK,
        views::talks::list(session.user()?, &talks, state.event_offset, &store),
    ))
}

pub(crate) async fn new_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    render_form(
        &session,
        session.user()?,
        &Route::NewTalk.path(),
        &TalkForm::empty(state.event_offset),
        &TalkFormState::new(),
        StatusCode::OK,
    )
    .await
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let form = TalkForm::from_pairs(form_urlencoded::parse(&body), state.event_offset, false);
    let hub = NavigationHub::new();
    let mut page: Page<DeleteModal<TalkId>> = Page::mount(&hub);

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Talks, |input| async move {
        backend.create_talk(&input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => {
            render_form(
                &session,
                session.user()?,
                &Route::NewTalk.path(),
                &form,
                &page.unmount(),
                rerender_status(&outcome),
            )
            .await
        }
    }
}

pub(crate) async fn edit_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = TalkId::new(id);
    let talk = session
        .backend
        .talk(&id)
        .await?
        .ok_or(PageError::NotFound("talk"))?;
    render_form(
        &session,
        session.user()?,
        &Route::EditTalk(id).path(),
        &TalkForm::from_talk(&talk, state.event_offset),
        &TalkFormState::new(),
        StatusCode::OK,
    )
    .await
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = TalkId::new(id);
    let form = TalkForm::from_pairs(form_urlencoded::parse(&body), state.event_offset, true);
    let hub = NavigationHub::new();
    let mut page: Page<DeleteModal<TalkId>> = Page::mount(&hub);

    let backend = session.backend.clone();
    let talk_id = id.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Talks, |input| async move {
        backend.update_talk(&talk_id, &input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => {
            render_form(
                &session,
                session.user()?,
                &Route::EditTalk(id).path(),
                &form,
                &page.unmount(),
                rerender_status(&outcome),
            )
            .await
        }
    }
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let mut store = TalkFormState::new();
    store.open_delete_modal(TalkId::new(id));

    let backend = session.backend.clone();
    confirm_delete(&mut store, |id| async move { backend.delete_talk(&id).await }).await;
    Ok(see_other(&Route::Talks))
}
