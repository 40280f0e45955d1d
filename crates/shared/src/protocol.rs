use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::{EntityStatus, FileId, RoomId, SpeakerId};

/// Body posted to the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct GraphqlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

/// Variables of `createSpeaker` / `updateSpeaker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerInput {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub first_name: String,
    pub last_name: String,
    pub short_description: String,
    pub long_description: String,
    pub status: EntityStatus,
    pub photo_id: Option<FileId>,
}

/// Variables of `createTalk` / `updateTalk`. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkInput {
    pub name: String,
    pub description: String,
    pub starts: Option<String>,
    pub ends: Option<String>,
    pub room: Option<RoomId>,
    pub speakers: Vec<SpeakerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInput {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// One half of a speaker position swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: SpeakerId,
    pub position: i64,
}

/// Body returned by the file storage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub id: FileId,
    #[serde(default)]
    pub url: String,
}
