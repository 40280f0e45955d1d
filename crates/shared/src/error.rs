use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Unavailable,
    Internal,
}

impl ErrorCode {
    /// Short message shown in the form banner for a failed remote call.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Unauthorized => "Your session has expired, please sign in again",
            Self::Forbidden => "You are not allowed to do that",
            Self::NotFound => "The record no longer exists",
            Self::Validation => "The server rejected the submitted values",
            Self::Unavailable => "The backend is unreachable, please retry",
            Self::Internal => "Something went wrong on the server",
        }
    }
}
