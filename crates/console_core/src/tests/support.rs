//! In-memory backend and navigator recording every call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_core::{ClientError, ClientResult, ConferenceBackend, FileUpload, FileUploader};
use shared::{
    domain::{
        EntityStatus, FileId, PhotoRef, Room, RoomId, Speaker, SpeakerId, Talk, TalkId, User,
        UserId,
    },
    protocol::{CreateUserInput, PositionUpdate, RoomInput, SigninInput, SpeakerInput, TalkInput},
};

use crate::navigation::{Navigator, Route};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSpeaker(SpeakerInput),
    UpdateSpeaker(SpeakerId, SpeakerInput),
    Position(PositionUpdate),
    CreateRoom(RoomInput),
    CreateTalk(TalkInput),
    Upload(String),
    Other(&'static str),
}

#[derive(Default)]
pub struct FakeBackend {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_with: Option<u16>,
    pub fail_position_for: Option<SpeakerId>,
}

impl FakeBackend {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls").clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> ClientResult<()> {
        self.calls.lock().expect("calls").push(call);
        match self.fail_with {
            Some(status) => Err(ClientError::Status { operation, status }),
            None => Ok(()),
        }
    }
}

pub fn speaker(id: &str, position: i64) -> Speaker {
    Speaker {
        id: SpeakerId::new(id),
        position,
        display_name: id.to_uppercase(),
        first_name: None,
        last_name: None,
        email: None,
        phone: None,
        organization: None,
        short_description: None,
        long_description: None,
        status: EntityStatus::Inactive,
        photo: None,
    }
}

#[async_trait]
impl ConferenceBackend for FakeBackend {
    async fn current_user(&self) -> ClientResult<Option<User>> {
        self.record("getUser", Call::Other("current_user"))?;
        Ok(None)
    }

    async fn signin(&self, _input: &SigninInput) -> ClientResult<String> {
        self.record("Signin", Call::Other("signin"))?;
        Ok("token".to_string())
    }

    async fn create_user(&self, _input: &CreateUserInput) -> ClientResult<UserId> {
        self.record("Create", Call::Other("create_user"))?;
        Ok(UserId::new("u1"))
    }

    async fn register(&self, _input: &CreateUserInput) -> ClientResult<String> {
        self.record("Register", Call::Other("register"))?;
        Ok("token".to_string())
    }

    async fn list_speakers(&self) -> ClientResult<Vec<Speaker>> {
        self.record("speakersQuery", Call::Other("list_speakers"))?;
        Ok(Vec::new())
    }

    async fn speaker(&self, _id: &SpeakerId) -> ClientResult<Option<Speaker>> {
        self.record("oneSpeaker", Call::Other("speaker"))?;
        Ok(None)
    }

    async fn create_speaker(&self, input: &SpeakerInput) -> ClientResult<SpeakerId> {
        self.record("createSpeaker", Call::CreateSpeaker(input.clone()))?;
        Ok(SpeakerId::new("s-new"))
    }

    async fn update_speaker(&self, id: &SpeakerId, input: &SpeakerInput) -> ClientResult<()> {
        self.record("updateSpeaker", Call::UpdateSpeaker(id.clone(), input.clone()))
    }

    async fn update_speaker_position(&self, update: &PositionUpdate) -> ClientResult<()> {
        self.record("updateSpeakerPosition", Call::Position(update.clone()))?;
        if self.fail_position_for.as_ref() == Some(&update.id) {
            return Err(ClientError::Status {
                operation: "updateSpeakerPosition",
                status: 502,
            });
        }
        Ok(())
    }

    async fn delete_speaker(&self, _id: &SpeakerId) -> ClientResult<()> {
        self.record("deleteSpeaker", Call::Other("delete_speaker"))
    }

    async fn list_talks(&self) -> ClientResult<Vec<Talk>> {
        self.record("talksQuery", Call::Other("list_talks"))?;
        Ok(Vec::new())
    }

    async fn talk(&self, _id: &TalkId) -> ClientResult<Option<Talk>> {
        self.record("oneTalk", Call::Other("talk"))?;
        Ok(None)
    }

    async fn create_talk(&self, input: &TalkInput) -> ClientResult<TalkId> {
        self.record("createTalk", Call::CreateTalk(input.clone()))?;
        Ok(TalkId::new("t-new"))
    }

    async fn update_talk(&self, _id: &TalkId, _input: &TalkInput) -> ClientResult<()> {
        self.record("updateTalk", Call::Other("update_talk"))
    }

    async fn delete_talk(&self, _id: &TalkId) -> ClientResult<()> {
        self.record("deleteTalk", Call::Other("delete_talk"))
    }

    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        self.record("roomsQuery", Call::Other("list_rooms"))?;
        Ok(Vec::new())
    }

    async fn room(&self, _id: &RoomId) -> ClientResult<Option<Room>> {
        self.record("oneRoom", Call::Other("room"))?;
        Ok(None)
    }

    async fn create_room(&self, input: &RoomInput) -> ClientResult<RoomId> {
        self.record("createRoom", Call::CreateRoom(input.clone()))?;
        Ok(RoomId::new("r-new"))
    }

    async fn update_room(&self, _id: &RoomId, _input: &RoomInput) -> ClientResult<()> {
        self.record("updateRoom", Call::Other("update_room"))
    }

    async fn delete_room(&self, _id: &RoomId) -> ClientResult<()> {
        self.record("deleteRoom", Call::Other("delete_room"))
    }
}

#[async_trait]
impl FileUploader for FakeBackend {
    async fn upload(&self, file: FileUpload) -> ClientResult<PhotoRef> {
        self.record("upload", Call::Upload(file.filename))?;
        Ok(PhotoRef {
            id: FileId::new("f-new"),
            url: "https://files.example/f-new".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub pushed: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn pushed(&self) -> Vec<Route> {
        self.pushed.lock().expect("pushed").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.pushed.lock().expect("pushed").push(route);
    }
}
