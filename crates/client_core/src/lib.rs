use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use shared::{
    domain::{PhotoRef, Room, RoomId, Speaker, SpeakerId, Talk, TalkId, User, UserId},
    protocol::{
        CreateUserInput, FileUploadResponse, GraphqlRequest, GraphqlResponse, PositionUpdate,
        RoomInput, SigninInput, SpeakerInput, TalkInput,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod cookie;
pub mod error;
pub mod queries;
pub mod session;

pub use error::ClientError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Remote operations of the hosted conference backend.
#[async_trait]
pub trait ConferenceBackend: Send + Sync {
    async fn current_user(&self) -> ClientResult<Option<User>>;
    async fn signin(&self, input: &SigninInput) -> ClientResult<String>;
    async fn create_user(&self, input: &CreateUserInput) -> ClientResult<UserId>;
    /// Creates a `USER` account and signs it in within one request; returns the token.
    async fn register(&self, input: &CreateUserInput) -> ClientResult<String>;

    async fn list_speakers(&self) -> ClientResult<Vec<Speaker>>;
    async fn speaker(&self, id: &SpeakerId) -> ClientResult<Option<Speaker>>;
    async fn create_speaker(&self, input: &SpeakerInput) -> ClientResult<SpeakerId>;
    async fn update_speaker(&self, id: &SpeakerId, input: &SpeakerInput) -> ClientResult<()>;
    async fn update_speaker_position(&self, update: &PositionUpdate) -> ClientResult<()>;
    async fn delete_speaker(&self, id: &SpeakerId) -> ClientResult<()>;

    async fn list_talks(&self) -> ClientResult<Vec<Talk>>;
    async fn talk(&self, id: &TalkId) -> ClientResult<Option<Talk>>;
    async fn create_talk(&self, input: &TalkInput) -> ClientResult<TalkId>;
    async fn update_talk(&self, id: &TalkId, input: &TalkInput) -> ClientResult<()>;
    async fn delete_talk(&self, id: &TalkId) -> ClientResult<()>;

    async fn list_rooms(&self) -> ClientResult<Vec<Room>>;
    async fn room(&self, id: &RoomId) -> ClientResult<Option<Room>>;
    async fn create_room(&self, input: &RoomInput) -> ClientResult<RoomId>;
    async fn update_room(&self, id: &RoomId, input: &RoomInput) -> ClientResult<()>;
    async fn delete_room(&self, id: &RoomId) -> ClientResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// File storage endpoint that hosts speaker photos.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(&self, file: FileUpload) -> ClientResult<PhotoRef>;
}

#[derive(Debug, Deserialize)]
struct IdOnly<T> {
    id: T,
}

#[derive(Debug, Deserialize)]
struct SigninPayload {
    token: String,
}

/// GraphQL client for the hosted backend.
///
/// Cloning is cheap; [`GraphqlClient::authorized`] yields a copy that sends the
/// session token as a bearer credential.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: Client,
    endpoint: Url,
    file_endpoint: Url,
    token: Option<String>,
}

impl GraphqlClient {
    pub fn new(endpoint: &str, file_endpoint: &str, timeout: Duration) -> ClientResult<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| ClientError::InvalidEndpoint(endpoint.to_string()))?;
        let file_endpoint = Url::parse(file_endpoint)
            .map_err(|_| ClientError::InvalidEndpoint(file_endpoint.to_string()))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                operation: "client_setup",
                source,
            })?;
        Ok(Self {
            http,
            endpoint,
            file_endpoint,
            token: None,
        })
    }

    pub fn authorized(&self, token: Option<&str>) -> Self {
        Self {
            token: token
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
            ..self.clone()
        }
    }

    async fn execute(&self, request: GraphqlRequest) -> ClientResult<serde_json::Map<String, Value>> {
        let operation = request.operation_name;
        let mut builder = self.http.post(self.endpoint.clone()).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status.is_server_error() {
            return Err(ClientError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        // GraphQL servers answer rejected operations with 200 or 400 and an `errors` body.
        let body: GraphqlResponse<serde_json::Map<String, Value>> = response
            .json()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        if !body.errors.is_empty() {
            warn!(operation, errors = ?body.errors, "graphql operation rejected");
            return Err(ClientError::Graphql {
                operation,
                errors: body.errors,
            });
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        debug!(operation, "graphql operation completed");
        body.data.ok_or(ClientError::MissingData { operation })
    }

    async fn field<T: DeserializeOwned>(
        &self,
        request: GraphqlRequest,
        field: &str,
    ) -> ClientResult<T> {
        let operation = request.operation_name;
        let mut data = self.execute(request).await?;
        let value = data.remove(field).unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| ClientError::Decode { operation, source })
    }

    async fn required_field<T: DeserializeOwned>(
        &self,
        request: GraphqlRequest,
        field: &str,
    ) -> ClientResult<T> {
        let operation = request.operation_name;
        self.field::<Option<T>>(request, field)
            .await?
            .ok_or(ClientError::MissingData { operation })
    }
}

fn speaker_variables(id: Option<&SpeakerId>, input: &SpeakerInput) -> Value {
    let mut variables = json!({
        "displayName": input.display_name,
        "email": input.email,
        "phone": input.phone,
        "organization": input.organization,
        "firstName": input.first_name,
        "lastName": input.last_name,
        "shortDescription": input.short_description,
        "longDescription": input.long_description,
        "status": input.status,
        "photoId": input.photo_id,
    });
    if let Some(id) = id {
        variables["id"] = json!(id);
    }
    variables
}

fn talk_variables(id: Option<&TalkId>, input: &TalkInput) -> Value {
    let mut variables = json!({
        "name": input.name,
        "description": input.description,
        "starts": input.starts,
        "ends": input.ends,
        "room": input.room,
        "speakers": input.speakers,
    });
    if let Some(id) = id {
        variables["id"] = json!(id);
        variables["status"] = json!(input.status.unwrap_or_default());
    }
    variables
}

fn room_variables(id: Option<&RoomId>, input: &RoomInput) -> Value {
    let mut variables = json!({
        "name": input.name,
        "capacity": input.capacity,
    });
    if let Some(id) = id {
        variables["id"] = json!(id);
    }
    variables
}

#[async_trait]
impl ConferenceBackend for GraphqlClient {
    async fn current_user(&self) -> ClientResult<Option<User>> {
        self.field(
            GraphqlRequest {
                operation_name: "getUser",
                query: queries::CURRENT_USER,
                variables: json!({}),
            },
            "user",
        )
        .await
    }

    async fn signin(&self, input: &SigninInput) -> ClientResult<String> {
        let payload: SigninPayload = self
            .required_field(
                GraphqlRequest {
                    operation_name: "Signin",
                    query: queries::SIGNIN_USER,
                    variables: json!(input),
                },
                "signinUser",
            )
            .await?;
        Ok(payload.token)
    }

    async fn create_user(&self, input: &CreateUserInput) -> ClientResult<UserId> {
        let created: IdOnly<UserId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "Create",
                    query: queries::CREATE_USER,
                    variables: json!(input),
                },
                "createUser",
            )
            .await?;
        Ok(created.id)
    }

    async fn register(&self, input: &CreateUserInput) -> ClientResult<String> {
        let payload: SigninPayload = self
            .required_field(
                GraphqlRequest {
                    operation_name: "Register",
                    query: queries::REGISTER_USER,
                    variables: json!(input),
                },
                "signinUser",
            )
            .await?;
        Ok(payload.token)
    }

    async fn list_speakers(&self) -> ClientResult<Vec<Speaker>> {
        self.required_field(
            GraphqlRequest {
                operation_name: "speakersQuery",
                query: queries::ALL_SPEAKERS,
                variables: json!({}),
            },
            "allSpeakers",
        )
        .await
    }

    async fn speaker(&self, id: &SpeakerId) -> ClientResult<Option<Speaker>> {
        self.field(
            GraphqlRequest {
                operation_name: "oneSpeaker",
                query: queries::ONE_SPEAKER,
                variables: json!({ "id": id }),
            },
            "Speaker",
        )
        .await
    }

    async fn create_speaker(&self, input: &SpeakerInput) -> ClientResult<SpeakerId> {
        let created: IdOnly<SpeakerId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "createSpeaker",
                    query: queries::CREATE_SPEAKER,
                    variables: speaker_variables(None, input),
                },
                "createSpeaker",
            )
            .await?;
        Ok(created.id)
    }

    async fn update_speaker(&self, id: &SpeakerId, input: &SpeakerInput) -> ClientResult<()> {
        let _: IdOnly<SpeakerId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "updateSpeaker",
                    query: queries::UPDATE_SPEAKER,
                    variables: speaker_variables(Some(id), input),
                },
                "updateSpeaker",
            )
            .await?;
        Ok(())
    }

    async fn update_speaker_position(&self, update: &PositionUpdate) -> ClientResult<()> {
        let _: IdOnly<SpeakerId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "updateSpeakerPosition",
                    query: queries::UPDATE_SPEAKER_POSITION,
                    variables: json!(update),
                },
                "updateSpeaker",
            )
            .await?;
        Ok(())
    }

    async fn delete_speaker(&self, id: &SpeakerId) -> ClientResult<()> {
        let _: IdOnly<SpeakerId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "deleteSpeaker",
                    query: queries::DELETE_SPEAKER,
                    variables: json!({ "id": id }),
                },
                "deleteSpeaker",
            )
            .await?;
        Ok(())
    }

    async fn list_talks(&self) -> ClientResult<Vec<Talk>> {
        self.required_field(
            GraphqlRequest {
                operation_name: "talksQuery",
                query: queries::ALL_TALKS,
                variables: json!({}),
            },
            "allTalks",
        )
        .await
    }

    async fn talk(&self, id: &TalkId) -> ClientResult<Option<Talk>> {
        self.field(
            GraphqlRequest {
                operation_name: "oneTalk",
                query: queries::ONE_TALK,
                variables: json!({ "id": id }),
            },
            "Talk",
        )
        .await
    }

    async fn create_talk(&self, input: &TalkInput) -> ClientResult<TalkId> {
        let created: IdOnly<TalkId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "createTalk",
                    query: queries::CREATE_TALK,
                    variables: talk_variables(None, input),
                },
                "createTalk",
            )
            .await?;
        Ok(created.id)
    }

    async fn update_talk(&self, id: &TalkId, input: &TalkInput) -> ClientResult<()> {
        let _: IdOnly<TalkId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "updateTalk",
                    query: queries::UPDATE_TALK,
                    variables: talk_variables(Some(id), input),
                },
                "updateTalk",
            )
            .await?;
        Ok(())
    }

    async fn delete_talk(&self, id: &TalkId) -> ClientResult<()> {
        let _: IdOnly<TalkId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "deleteTalk",
                    query: queries::DELETE_TALK,
                    variables: json!({ "id": id }),
                },
                "deleteTalk",
            )
            .await?;
        Ok(())
    }

    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        self.required_field(
            GraphqlRequest {
                operation_name: "roomsQuery",
                query: queries::ALL_ROOMS,
                variables: json!({}),
            },
            "allRooms",
        )
        .await
    }

    async fn room(&self, id: &RoomId) -> ClientResult<Option<Room>> {
        self.field(
            GraphqlRequest {
                operation_name: "oneRoom",
                query: queries::ONE_ROOM,
                variables: json!({ "id": id }),
            },
            "Room",
        )
        .await
    }

    async fn create_room(&self, input: &RoomInput) -> ClientResult<RoomId> {
        let created: IdOnly<RoomId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "createRoom",
                    query: queries::CREATE_ROOM,
                    variables: room_variables(None, input),
                },
                "createRoom",
            )
            .await?;
        Ok(created.id)
    }

    async fn update_room(&self, id: &RoomId, input: &RoomInput) -> ClientResult<()> {
        let _: IdOnly<RoomId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "updateRoom",
                    query: queries::UPDATE_ROOM,
                    variables: room_variables(Some(id), input),
                },
                "updateRoom",
            )
            .await?;
        Ok(())
    }

    async fn delete_room(&self, id: &RoomId) -> ClientResult<()> {
        let _: IdOnly<RoomId> = self
            .required_field(
                GraphqlRequest {
                    operation_name: "deleteRoom",
                    query: queries::DELETE_ROOM,
                    variables: json!({ "id": id }),
                },
                "deleteRoom",
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FileUploader for GraphqlClient {
    async fn upload(&self, file: FileUpload) -> ClientResult<PhotoRef> {
        let operation = "fileUpload";
        let size = file.bytes.len();
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .map_err(|source| ClientError::Transport { operation, source })?;
        let form = multipart::Form::new().part("data", part);

        let response = self
            .http
            .post(self.file_endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        let body: FileUploadResponse = response
            .json()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        debug!(file_id = %body.id, size, "photo uploaded");
        Ok(PhotoRef {
            id: body.id,
            url: body.url,
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
