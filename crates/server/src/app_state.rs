use std::sync::Arc;

use chrono::FixedOffset;
use client_core::{ConferenceBackend, FileUploader, GraphqlClient};

/// Everything a page needs from the hosted backend.
pub(crate) trait ConsoleBackend: ConferenceBackend + FileUploader {}

impl<T: ConferenceBackend + FileUploader> ConsoleBackend for T {}

/// Hands out a backend authorised with the request's session token.
pub(crate) trait BackendFactory: Send + Sync {
    fn for_token(&self, token: Option<&str>) -> Arc<dyn ConsoleBackend>;
}

impl BackendFactory for GraphqlClient {
    fn for_token(&self, token: Option<&str>) -> Arc<dyn ConsoleBackend> {
        Arc::new(self.authorized(token))
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) backends: Arc<dyn BackendFactory>,
    pub(crate) event_offset: FixedOffset,
    pub(crate) cookie_secure: bool,
}
