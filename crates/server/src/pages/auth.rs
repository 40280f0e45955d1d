use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Form,
};
use client_core::{
    cookie::{clear_token_cookie, set_token_cookie},
    session::Access,
};
use console_core::{
    forms::{LoginForm, RegistrationForm},
    orchestrator::submit,
    page::Page,
    store::{LoginFormState, RegisterFormState},
    NavigationHub, Route, SubmitOutcome,
};
use tracing::info;

use super::{html, open_session, redirect_with_cookie, rerender_status, see_other, PageError, PageResult};
use crate::{app_state::AppState, views};

pub(crate) async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    open_session(&state, &headers, Access::Anonymous).await?;
    Ok(html(
        StatusCode::OK,
        views::auth::login(&LoginForm::default(), &LoginFormState::new()),
    ))
}

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Anonymous).await?;
    let hub = NavigationHub::new();
    let mut page: Page<()> = Page::mount(&hub);

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Dashboard, |input| async move {
        backend.signin(&input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { value: token, destination } => {
            info!("user signed in");
            signed_in(&state, &token, &destination)
        }
        outcome => Ok(html(
            rerender_status(&outcome),
            views::auth::login(&form, &page.unmount()),
        )),
    }
}

pub(crate) async fn register_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> PageResult {
    open_session(&state, &headers, Access::Anonymous).await?;
    Ok(html(
        StatusCode::OK,
        views::auth::registration(&RegistrationForm::default(), &RegisterFormState::new(), None),
    ))
}

/// Creates a `USER` account and signs it in.
pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RegistrationForm>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Anonymous).await?;
    let hub = NavigationHub::new();
    let mut page: Page<()> = Page::mount(&hub);

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Dashboard, |input| async move {
        backend.register(&input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { value: token, destination } => {
            info!("user registered");
            signed_in(&state, &token, &destination)
        }
        outcome => Ok(html(
            rerender_status(&outcome),
            views::auth::registration(&form, &page.unmount(), None),
        )),
    }
}

pub(crate) async fn create_user_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Manager).await?;
    Ok(html(
        StatusCode::OK,
        views::auth::registration(
            &RegistrationForm::default(),
            &RegisterFormState::new(),
            Some(session.user()?),
        ),
    ))
}

/// Manager-only account creation; the manager stays signed in.
pub(crate) async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RegistrationForm>,
) -> PageResult {
    let session = open_session(&state, &headers, Access::Manager).await?;
    let manager = session.user()?;
    let hub = NavigationHub::new();
    let mut page: Page<()> = Page::mount(&hub);

    let backend = session.backend.clone();
    let outcome = submit(&mut page.store, &form, &hub, Route::Dashboard, |input| async move {
        backend.create_user(&input).await
    })
    .await;
    page.sync_navigation();

    match outcome {
        SubmitOutcome::Succeeded { value: user_id, destination } => {
            info!(user = %user_id, manager = %manager.id, "user created");
            Ok(see_other(&destination))
        }
        outcome => Ok(html(
            rerender_status(&outcome),
            views::auth::registration(&form, &page.unmount(), Some(manager)),
        )),
    }
}

pub(crate) async fn logout(State(state): State<Arc<AppState>>) -> PageResult {
    Ok(redirect_with_cookie(
        &Route::Login,
        &clear_token_cookie(state.cookie_secure),
    ))
}

fn signed_in(state: &AppState, token: &str, destination: &Route) -> PageResult {
    let cookie = set_token_cookie(token, state.cookie_secure)
        .ok_or(PageError::Internal("session token cannot be stored in a cookie"))?;
    Ok(redirect_with_cookie(destination, &cookie))
}
