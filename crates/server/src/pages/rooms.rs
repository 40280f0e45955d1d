use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Form,
};
use client_core::session::Access;
use console_core::{
    delete_flow::confirm_delete,
    forms::RoomForm,
    orchestrator::submit,
    page::Page,
    store::{DeleteModal, RoomFormState},
    NavigationHub, Route, SubmitOutcome,
};
use shared::domain::RoomId;

use super::{html, open_session, rerender_status, see_other, ListQuery, PageError, PageResult};
use crate::{app_state::AppState, views};

pub(crate) async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let rooms = session.backend.list_rooms().await?;

    let mut store = RoomFormState::new();
    if let Some(id) = query.delete.filter(|id| !id.is_empty()) {
        store.open_delete_modal(RoomId::new(id));
    }
    Ok(html(
        StatusCode::OK,
        views::rooms::list(session.user()?, &rooms, &store),
    ))
}

pub(crate) async fn new_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    Ok(html(
        StatusCode::OK,
        views::rooms::form(
            session.user()?,
            &Route::NewRoom.path(),
            &RoomForm::default(),
            &RoomFormState::new(),
        ),
    ))
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RoomForm>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let hub = NavigationHub::new();
    let mut page: Page<DeleteModal<RoomId>> = Page::mount(&hub);

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Rooms, |input| async move {
        backend.create_room(&input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => Ok(html(
            rerender_status(&outcome),
            views::rooms::form(session.user()?, &Route::NewRoom.path(), &form, &page.unmount()),
        )),
    }
}

pub(crate) async fn edit_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = RoomId::new(id);
    let room = session
        .backend
        .room(&id)
        .await?
        .ok_or(PageError::NotFound("room"))?;
    Ok(html(
        StatusCode::OK,
        views::rooms::form(
            session.user()?,
            &Route::EditRoom(id).path(),
            &RoomForm::from_room(&room),
            &RoomFormState::new(),
        ),
    ))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<RoomForm>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = RoomId::new(id);
    let hub = NavigationHub::new();
    let mut page: Page<DeleteModal<RoomId>> = Page::mount(&hub);

    let backend = session.backend.clone();
    let room_id = id.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Rooms, |input| async move {
        backend.update_room(&room_id, &input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => Ok(html(
            rerender_status(&outcome),
            views::rooms::form(
                session.user()?,
                &Route::EditRoom(id).path(),
                &form,
                &page.unmount(),
            ),
        )),
    }
}

/// The modal's "Yes": delete, close the modal, then reload the list.
pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let mut store = RoomFormState::new();
    store.open_delete_modal(RoomId::new(id));

    let backend = session.backend.clone();
    confirm_delete(&mut store, |id| async move { backend.delete_room(&id).await }).await;
    Ok(see_other(&Route::Rooms))
}
