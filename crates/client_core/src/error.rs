use shared::{error::ErrorCode, protocol::GraphqlErrorEntry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request for {operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned HTTP {status}")]
    Status { operation: &'static str, status: u16 },
    #[error("{operation} rejected: {}", join_messages(.errors))]
    Graphql {
        operation: &'static str,
        errors: Vec<GraphqlErrorEntry>,
    },
    #[error("{operation} returned no data")]
    MissingData { operation: &'static str },
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint url '{0}'")]
    InvalidEndpoint(String),
}

fn join_messages(errors: &[GraphqlErrorEntry]) -> String {
    errors
        .iter()
        .map(|entry| entry.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport { .. } => ErrorCode::Unavailable,
            Self::Status { status, .. } => match status {
                401 => ErrorCode::Unauthorized,
                403 => ErrorCode::Forbidden,
                404 => ErrorCode::NotFound,
                400 | 413 | 415 | 422 => ErrorCode::Validation,
                502..=504 => ErrorCode::Unavailable,
                _ => ErrorCode::Internal,
            },
            Self::Graphql { errors, .. } => classify_graphql(errors),
            Self::MissingData { .. } | Self::Decode { .. } | Self::InvalidEndpoint(_) => {
                ErrorCode::Internal
            }
        }
    }

    /// Text placed into the form's `error` entry when a remote call fails.
    ///
    /// Backend rejections carry a meaningful message (bad credentials, duplicate
    /// email); every other failure is reduced to the category summary.
    pub fn user_message(&self) -> String {
        match self {
            Self::Graphql { errors, .. } => match errors.first() {
                Some(entry) if !entry.message.trim().is_empty() => entry.message.clone(),
                _ => self.code().summary().to_string(),
            },
            _ => self.code().summary().to_string(),
        }
    }
}

fn classify_graphql(errors: &[GraphqlErrorEntry]) -> ErrorCode {
    let lower = join_messages(errors).to_ascii_lowercase();
    if lower.contains("insufficient permissions") || lower.contains("permission") {
        ErrorCode::Forbidden
    } else if lower.contains("not authenticated")
        || lower.contains("invalid token")
        || lower.contains("expired")
    {
        ErrorCode::Unauthorized
    } else if lower.contains("does not exist") || lower.contains("no node") {
        ErrorCode::NotFound
    } else {
        ErrorCode::Validation
    }
}
