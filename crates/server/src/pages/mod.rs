use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use client_core::{
    cookie::token_from_cookie_header,
    session::{guard, Access, SessionDecision},
    ClientError,
};
use console_core::{orchestrator::SubmitOutcome, Route};
use serde::Deserialize;
use shared::{domain::User, error::ErrorCode};
use tracing::{debug, warn};

use crate::{app_state::{AppState, ConsoleBackend}, views};

pub(crate) mod auth;
pub(crate) mod dashboard;
pub(crate) mod rooms;
pub(crate) mod speakers;
pub(crate) mod talks;

pub(crate) type PageResult = Result<Response, PageError>;

#[derive(Debug)]
pub(crate) enum PageError {
    Redirect(String),
    Remote(ClientError),
    NotFound(&'static str),
    BadRequest(String),
    Internal(&'static str),
}

impl From<ClientError> for PageError {
    fn from(err: ClientError) -> Self {
        Self::Remote(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(to) => Redirect::to(&to).into_response(),
            Self::Remote(err) => {
                let code = err.code();
                if code == ErrorCode::Unauthorized {
                    return Redirect::to(&Route::Login.path()).into_response();
                }
                warn!(error = %err, ?code, "page data unavailable");
                (
                    status_for(code),
                    Html(views::error_page(None, code, &err.user_message())),
                )
                    .into_response()
            }
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Html(views::error_page(
                    None,
                    ErrorCode::NotFound,
                    &format!("{what} not found"),
                )),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Html(views::error_page(None, ErrorCode::Validation, &message)),
            )
                .into_response(),
            Self::Internal(message) => {
                warn!(message, "page failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page(None, ErrorCode::Internal, message)),
                )
                    .into_response()
            }
        }
    }
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Unavailable => StatusCode::BAD_GATEWAY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Status for re-rendering a form after an unsuccessful submission.
pub(crate) fn rerender_status<T>(outcome: &SubmitOutcome<T>) -> StatusCode {
    match outcome {
        SubmitOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Failed { code, .. } => status_for(*code),
        SubmitOutcome::Succeeded { .. } => StatusCode::OK,
    }
}

pub(crate) fn html(status: StatusCode, page: String) -> Response {
    (status, Html(page)).into_response()
}

pub(crate) fn see_other(route: &Route) -> Response {
    Redirect::to(&route.path()).into_response()
}

/// Redirect that also sets or clears the session cookie.
pub(crate) fn redirect_with_cookie(route: &Route, cookie: &str) -> Response {
    let mut response = see_other(route);
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(error) => warn!(%error, "dropping unencodable session cookie"),
    }
    response
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub delete: Option<String>,
}

pub(crate) struct Session {
    pub backend: Arc<dyn ConsoleBackend>,
    pub user: Option<User>,
}

impl Session {
    /// The signed-in user; guaranteed by every access level but `Anonymous`.
    pub fn user(&self) -> Result<&User, PageError> {
        self.user
            .as_ref()
            .ok_or_else(|| PageError::Redirect(Route::Login.path()))
    }
}

pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
}

/// Runs the session guard for `access` before any page state exists.
pub(crate) async fn open_session(
    state: &AppState,
    headers: &HeaderMap,
    access: Access,
) -> Result<Session, PageError> {
    let token = session_token(headers);
    let backend = state.backends.for_token(token.as_deref());
    match guard(backend.as_ref(), token.as_deref(), access).await {
        SessionDecision::Proceed(user) => Ok(Session { backend, user }),
        SessionDecision::Redirect(to) => {
            debug!(?access, to, "session guard redirect");
            Err(PageError::Redirect(to.to_string()))
        }
    }
}
