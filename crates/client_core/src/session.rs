//! Session guard run before any page renders.

use shared::domain::User;
use tracing::debug;

use crate::ConferenceBackend;

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Sign-in and registration pages; signed-in users are sent home.
    Anonymous,
    Authenticated,
    Manager,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDecision {
    Proceed(Option<User>),
    Redirect(&'static str),
}

/// Looks up the user behind the session token.
///
/// A missing token skips the query; a failed query counts as logged out.
pub async fn check_logged_in<B>(backend: &B, token: Option<&str>) -> Option<User>
where
    B: ConferenceBackend + ?Sized,
{
    token.filter(|token| !token.is_empty())?;
    match backend.current_user().await {
        Ok(user) => user,
        Err(err) => {
            debug!(error = %err, "session lookup failed; treating request as logged out");
            None
        }
    }
}

pub fn decide(access: Access, user: Option<User>) -> SessionDecision {
    match (access, user) {
        (Access::Anonymous, Some(_)) => SessionDecision::Redirect("/"),
        (Access::Anonymous, None) => SessionDecision::Proceed(None),
        (Access::Authenticated, Some(user)) => SessionDecision::Proceed(Some(user)),
        (Access::Manager, Some(user)) if user.is_manager() => SessionDecision::Proceed(Some(user)),
        (Access::Authenticated | Access::Manager, _) => SessionDecision::Redirect("/login"),
    }
}

pub async fn guard<B>(backend: &B, token: Option<&str>, access: Access) -> SessionDecision
where
    B: ConferenceBackend + ?Sized,
{
    let user = check_logged_in(backend, token).await;
    decide(access, user)
}
