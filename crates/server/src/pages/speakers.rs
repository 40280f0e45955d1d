use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use client_core::{session::Access, FileUpload};
use console_core::{
    delete_flow::confirm_delete,
    forms::{accept_photo, photo_preview_url, SpeakerForm},
    orchestrator::{save_speaker, submit, SpeakerTarget},
    page::Page,
    reorder::{apply_position_updates, plan_move, sort_by_position, Direction},
    store::{SpeakerExtras, SpeakerFormState},
    NavigationHub, Route, SubmitOutcome,
};
use shared::domain::SpeakerId;
use tracing::debug;

use super::{html, open_session, rerender_status, see_other, ListQuery, PageError, PageResult};
use crate::{app_state::AppState, views};

struct SpeakerSubmission {
    form: SpeakerForm,
    photo: Option<FileUpload>,
}

async fn read_submission(mut multipart: Multipart) -> Result<SpeakerSubmission, PageError> {
    let malformed = |err: axum::extract::multipart::MultipartError| PageError::BadRequest(err.body_text());
    let mut submission = SpeakerSubmission {
        form: SpeakerForm::default(),
        photo: None,
    };
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let filename = field.file_name().unwrap_or("photo").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(malformed)?;
            let size = bytes.len();
            submission.photo = accept_photo(FileUpload {
                filename,
                content_type: content_type.clone(),
                bytes: bytes.to_vec(),
            });
            if submission.photo.is_none() && size > 0 {
                debug!(%content_type, size, "ignoring rejected photo");
            }
        } else {
            let value = field.text().await.map_err(malformed)?;
            submission.form.set_field(&name, value);
        }
    }
    Ok(submission)
}

pub(crate) async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let mut speakers = session.backend.list_speakers().await?;
    sort_by_position(&mut speakers);

    let mut store = SpeakerFormState::new();
    if let Some(id) = query.delete.filter(|id| !id.is_empty()) {
        store.open_delete_modal(SpeakerId::new(id));
    }
    Ok(html(
        StatusCode::OK,
        views::speakers::list(session.user()?, &speakers, &store),
    ))
}

pub(crate) async fn new_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    Ok(html(
        StatusCode::OK,
        views::speakers::form(
            session.user()?,
            &Route::NewSpeaker.path(),
            &SpeakerForm::default(),
            None,
            false,
            &SpeakerFormState::new(),
        ),
    ))
}

/// New speakers always start `INACTIVE`.
pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let SpeakerSubmission { mut form, photo } = read_submission(multipart).await?;
    form.active = false;

    let hub = NavigationHub::new();
    let mut page: Page<SpeakerExtras> = Page::mount(&hub);
    if let Some(photo) = &photo {
        page.store.set_photo_preview(photo_preview_url(photo));
    }

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Speakers, |input| async move {
        save_speaker(backend.as_ref(), backend.as_ref(), &SpeakerTarget::Create, input, photo, None)
            .await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => Ok(html(
            rerender_status(&outcome),
            views::speakers::form(
                session.user()?,
                &Route::NewSpeaker.path(),
                &form,
                None,
                false,
                &page.unmount(),
            ),
        )),
    }
}

pub(crate) async fn edit_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = SpeakerId::new(id);
    let speaker = session
        .backend
        .speaker(&id)
        .await?
        .ok_or(PageError::NotFound("speaker"))?;
    Ok(html(
        StatusCode::OK,
        views::speakers::form(
            session.user()?,
            &Route::EditSpeaker(id).path(),
            &SpeakerForm::from_speaker(&speaker),
            speaker.photo.as_ref(),
            true,
            &SpeakerFormState::new(),
        ),
    ))
}

/// Without a new upload the speaker keeps its current photo.
pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let id = SpeakerId::new(id);
    let SpeakerSubmission { form, photo } = read_submission(multipart).await?;
    let existing = session
        .backend
        .speaker(&id)
        .await?
        .ok_or(PageError::NotFound("speaker"))?;

    let hub = NavigationHub::new();
    let mut page: Page<SpeakerExtras> = Page::mount(&hub);
    if let Some(photo) = &photo {
        page.store.set_photo_preview(photo_preview_url(photo));
    }

    let backend = session.backend.clone();
    let target = SpeakerTarget::Update(id.clone());
    let existing_photo = existing.photo.as_ref().map(|photo| photo.id.clone());
    let outcome = submit(&mut page.store, &form, &hub, Route::Speakers, |input| async move {
        save_speaker(backend.as_ref(), backend.as_ref(), &target, input, photo, existing_photo)
            .await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { destination, .. } => Ok(see_other(&destination)),
        outcome => Ok(html(
            rerender_status(&outcome),
            views::speakers::form(
                session.user()?,
                &Route::EditSpeaker(id).path(),
                &form,
                existing.photo.as_ref(),
                true,
                &page.unmount(),
            ),
        )),
    }
}

pub(crate) async fn move_up(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    reorder(&state, &headers, SpeakerId::new(id), Direction::Up).await
}

pub(crate) async fn move_down(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    reorder(&state, &headers, SpeakerId::new(id), Direction::Down).await
}

/// Trades positions with the neighbour in the freshly fetched order; moves past
/// either end are dropped without a backend call.
async fn reorder(
    state: &AppState,
    headers: &HeaderMap,
    id: SpeakerId,
    direction: Direction,
) -> PageResult {
    let session = open_session(state, headers, Access::Authenticated).await?;
    let mut speakers = session.backend.list_speakers().await?;
    sort_by_position(&mut speakers);

    match plan_move(&speakers, &id, direction) {
        Some(updates) => {
            apply_position_updates(session.backend.as_ref(), updates).await;
        }
        None => debug!(speaker = %id, ?direction, "move not available"),
    }
    Ok(see_other(&Route::Speakers))
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Authenticated).await?;
    let mut store = SpeakerFormState::new();
    store.open_delete_modal(SpeakerId::new(id));

    let backend = session.backend.clone();
    confirm_delete(&mut store, |id| async move { backend.delete_speaker(&id).await }).await;
    Ok(see_other(&Route::Speakers))
}
