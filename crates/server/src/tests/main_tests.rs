use std::sync::Mutex;

use super::*;
use crate::app_state::{BackendFactory, ConsoleBackend};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request, Response, StatusCode},
};
use chrono::FixedOffset;
use client_core::{ClientError, ClientResult, ConferenceBackend, FileUpload, FileUploader};
use shared::{
    domain::{
        EntityStatus, FileId, PhotoRef, Room, RoomId, Speaker, SpeakerId, Talk, TalkId, User,
        UserId, UserRole,
    },
    protocol::{CreateUserInput, PositionUpdate, RoomInput, SigninInput, SpeakerInput, TalkInput},
};
use tower::ServiceExt;

const TOKEN: &str = "jwt.payload.sig";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Signin(String),
    CreateUser(String),
    Register(String),
    Upload(String),
    CreateSpeaker(SpeakerInput),
    UpdateSpeaker(SpeakerId, SpeakerInput),
    CreateRoom(RoomInput),
    CreateTalk(TalkInput),
    Position(PositionUpdate),
    DeleteRoom(RoomId),
}

#[derive(Default)]
struct FakeConsole {
    user: Option<User>,
    speakers: Vec<Speaker>,
    talks: Vec<Talk>,
    rooms: Vec<Room>,
    fail_deletes: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeConsole {
    fn signed_in(role: UserRole) -> Self {
        Self {
            user: Some(User {
                id: UserId::new("u1"),
                name: "Ana Novak".to_string(),
                email: "ana@example.com".to_string(),
                role,
            }),
            ..Self::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ConferenceBackend for FakeConsole {
    async fn current_user(&self) -> ClientResult<Option<User>> {
        Ok(self.user.clone())
    }

    async fn signin(&self, input: &SigninInput) -> ClientResult<String> {
        self.record(Call::Signin(input.email.clone()));
        Ok(TOKEN.to_string())
    }

    async fn create_user(&self, input: &CreateUserInput) -> ClientResult<UserId> {
        self.record(Call::CreateUser(input.email.clone()));
        Ok(UserId::new("u2"))
    }

    async fn register(&self, input: &CreateUserInput) -> ClientResult<String> {
        self.record(Call::Register(input.email.clone()));
        Ok(TOKEN.to_string())
    }

    async fn list_speakers(&self) -> ClientResult<Vec<Speaker>> {
        Ok(self.speakers.clone())
    }

    async fn speaker(&self, id: &SpeakerId) -> ClientResult<Option<Speaker>> {
        Ok(self.speakers.iter().find(|speaker| &speaker.id == id).cloned())
    }

    async fn create_speaker(&self, input: &SpeakerInput) -> ClientResult<SpeakerId> {
        self.record(Call::CreateSpeaker(input.clone()));
        Ok(SpeakerId::new("s-new"))
    }

    async fn update_speaker(&self, id: &SpeakerId, input: &SpeakerInput) -> ClientResult<()> {
        self.record(Call::UpdateSpeaker(id.clone(), input.clone()));
        Ok(())
    }

    async fn update_speaker_position(&self, update: &PositionUpdate) -> ClientResult<()> {
        self.record(Call::Position(update.clone()));
        Ok(())
    }

    async fn delete_speaker(&self, _id: &SpeakerId) -> ClientResult<()> {
        Ok(())
    }

    async fn list_talks(&self) -> ClientResult<Vec<Talk>> {
        Ok(self.talks.clone())
    }

    async fn talk(&self, id: &TalkId) -> ClientResult<Option<Talk>> {
        Ok(self.talks.iter().find(|talk| &talk.id == id).cloned())
    }

    async fn create_talk(&self, input: &TalkInput) -> ClientResult<TalkId> {
        self.record(Call::CreateTalk(input.clone()));
        Ok(TalkId::new("t-new"))
    }

    async fn update_talk(&self, _id: &TalkId, _input: &TalkInput) -> ClientResult<()> {
        Ok(())
    }

    async fn delete_talk(&self, _id: &TalkId) -> ClientResult<()> {
        Ok(())
    }

    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    async fn room(&self, id: &RoomId) -> ClientResult<Option<Room>> {
        Ok(self.rooms.iter().find(|room| &room.id == id).cloned())
    }

    async fn create_room(&self, input: &RoomInput) -> ClientResult<RoomId> {
        self.record(Call::CreateRoom(input.clone()));
        Ok(RoomId::new("r-new"))
    }

    async fn update_room(&self, _id: &RoomId, _input: &RoomInput) -> ClientResult<()> {
        Ok(())
    }

    async fn delete_room(&self, id: &RoomId) -> ClientResult<()> {
        self.record(Call::DeleteRoom(id.clone()));
        if self.fail_deletes {
            return Err(ClientError::Status {
                operation: "deleteRoom",
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FileUploader for FakeConsole {
    async fn upload(&self, file: FileUpload) -> ClientResult<PhotoRef> {
        self.record(Call::Upload(file.filename.clone()));
        Ok(PhotoRef {
            id: FileId::new("f1"),
            url: format!("/files/{}", file.filename),
        })
    }
}

struct FakeFactory(Arc<FakeConsole>);

impl BackendFactory for FakeFactory {
    fn for_token(&self, _token: Option<&str>) -> Arc<dyn ConsoleBackend> {
        self.0.clone()
    }
}

fn test_app(console: FakeConsole) -> (Router, Arc<FakeConsole>) {
    let console = Arc::new(console);
    let state = AppState {
        backends: Arc::new(FakeFactory(console.clone())),
        event_offset: FixedOffset::east_opt(3600).expect("offset"),
        cookie_secure: false,
    };
    (build_router(Arc::new(state)), console)
}

fn speaker(id: &str, position: i64, status: EntityStatus) -> Speaker {
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
        status,
        photo: None,
    }
}

fn talk(id: &str, status: EntityStatus) -> Talk {
    Talk {
        id: TalkId::new(id),
        name: id.to_string(),
        description: None,
        starts: None,
        ends: None,
        status,
        room: None,
        speakers: Vec::new(),
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut request = Request::get(uri);
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("token={token}"));
    }
    request.body(Body::empty()).expect("request")
}

fn post_form(uri: &str, token: Option<&str>, form: &str) -> Request<Body> {
    let mut request =
        Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("token={token}"));
    }
    request.body(Body::from(form.to_string())).expect("request")
}

const BOUNDARY: &str = "console-form-boundary";

struct PhotoPart<'a> {
    filename: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
}

fn post_multipart(
    uri: &str,
    fields: &[(&str, &str)],
    photo: Option<PhotoPart<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(photo) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                photo.filename, photo.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(photo.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, format!("token={TOKEN}"))
        .body(Body::from(body))
        .expect("request")
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

fn set_cookie(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie header")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _console) = test_app(FakeConsole::default());
    let response = app.oneshot(get("/healthz", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn dashboard_without_session_redirects_to_login() {
    let (app, _console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app.oneshot(get("/", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn dashboard_counts_active_speakers_and_talks() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    console.speakers = vec![
        speaker("a", 1, EntityStatus::Active),
        speaker("b", 2, EntityStatus::Inactive),
    ];
    console.talks = vec![talk("keynote", EntityStatus::Active)];
    let (app, _console) = test_app(console);

    let response = app.oneshot(get("/", Some(TOKEN))).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<strong>1/2</strong> Active Speakers"));
    assert!(page.contains("<strong>1/1</strong> Active Talks"));
    assert!(page.contains("Ana Novak"));
    assert!(!page.contains("Create user"));
}

#[tokio::test]
async fn signed_in_user_is_sent_home_from_login() {
    let (app, _console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app.oneshot(get("/login", Some(TOKEN))).await.expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_stores_token_cookie_and_goes_home() {
    let (app, console) = test_app(FakeConsole::default());
    let response = app
        .oneshot(post_form(
            "/login",
            None,
            "email=ana%40example.com&password=secret",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("token=jwt.payload.sig;"));
    assert!(cookie.contains("Max-Age=2592000"));
    assert_eq!(console.calls(), vec![Call::Signin("ana@example.com".to_string())]);
}

#[tokio::test]
async fn registration_signs_in_with_a_single_backend_call() {
    let (app, console) = test_app(FakeConsole::default());
    let response = app
        .oneshot(post_form(
            "/register",
            None,
            "name=Bo&email=bo%40example.com&password=pw1234&passwordAgain=pw1234",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(set_cookie(&response).starts_with("token=jwt.payload.sig;"));
    assert_eq!(console.calls(), vec![Call::Register("bo@example.com".to_string())]);
}

#[tokio::test]
async fn invalid_login_rerenders_without_backend_call() {
    let (app, console) = test_app(FakeConsole::default());
    let response = app
        .oneshot(post_form("/login", None, "email=not-an-email&password="))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("E-mail is invalid"));
    assert!(page.contains("Password required"));
    assert!(console.calls().is_empty());
}

#[tokio::test]
async fn logout_expires_cookie() {
    let (app, _console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app.oneshot(get("/logout", Some(TOKEN))).await.expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(set_cookie(&response).contains("Max-Age=-1"));
}

#[tokio::test]
async fn create_user_requires_manager() {
    let (app, _console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(get("/create-user", Some(TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn manager_creates_user_without_switching_session() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::Manager));
    let response = app
        .oneshot(post_form(
            "/create-user",
            Some(TOKEN),
            "name=Bo&email=bo%40example.com&password=pw123&passwordAgain=pw123",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(console.calls(), vec![Call::CreateUser("bo@example.com".to_string())]);
}

#[tokio::test]
async fn valid_room_is_created_and_redirects_to_list() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_form("/rooms/new", Some(TOKEN), "name=Hall+A&capacity=120"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/rooms");
    assert_eq!(
        console.calls(),
        vec![Call::CreateRoom(RoomInput {
            name: "Hall A".to_string(),
            capacity: 120,
        })]
    );
}

#[tokio::test]
async fn invalid_room_rerenders_with_message() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_form("/rooms/new", Some(TOKEN), "name=Hall+A&capacity=many"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("Capacity has to be a number"));
    assert!(page.contains("value=\"Hall A\""));
    assert!(console.calls().is_empty());
}

#[tokio::test]
async fn failed_delete_still_returns_to_list() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    console.fail_deletes = true;
    let (app, console) = test_app(console);

    let response = app
        .oneshot(post_form("/rooms/r1/delete", Some(TOKEN), ""))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/rooms");
    assert_eq!(console.calls(), vec![Call::DeleteRoom(RoomId::new("r1"))]);
}

#[tokio::test]
async fn list_with_delete_query_shows_confirmation() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    console.speakers = vec![speaker("s1", 1, EntityStatus::Active)];
    let (app, _console) = test_app(console);

    let response = app
        .oneshot(get("/speakers?delete=s1", Some(TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Are you sure you want to delete this speaker?"));
    assert!(page.contains("/speakers/s1/delete"));
}

#[tokio::test]
async fn move_down_swaps_with_next_speaker() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    console.speakers = vec![
        speaker("c", 3, EntityStatus::Active),
        speaker("a", 1, EntityStatus::Active),
        speaker("b", 2, EntityStatus::Active),
    ];
    let (app, console) = test_app(console);

    let response = app
        .oneshot(post_form("/speakers/b/move-down", Some(TOKEN), ""))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/speakers");
    assert_eq!(
        console.calls(),
        vec![
            Call::Position(PositionUpdate {
                id: SpeakerId::new("b"),
                position: 3,
            }),
            Call::Position(PositionUpdate {
                id: SpeakerId::new("c"),
                position: 2,
            }),
        ]
    );
}

#[tokio::test]
async fn moving_last_speaker_down_sends_nothing() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    console.speakers = vec![
        speaker("a", 1, EntityStatus::Active),
        speaker("b", 2, EntityStatus::Active),
    ];
    let (app, console) = test_app(console);

    let response = app
        .oneshot(post_form("/speakers/b/move-down", Some(TOKEN), ""))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(console.calls().is_empty());
}

#[tokio::test]
async fn talk_create_collects_checked_speakers_once() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_form(
            "/talks/new",
            Some(TOKEN),
            "name=Keynote&description=&starts=&ends=&room=r1&speaker=s1&speaker=s2&speaker=s1",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/talks");
    let calls = console.calls();
    let [Call::CreateTalk(input)] = calls.as_slice() else {
        panic!("expected a single createTalk call, got {calls:?}");
    };
    assert_eq!(input.name, "Keynote");
    assert_eq!(input.room, Some(RoomId::new("r1")));
    assert_eq!(input.speakers, vec![SpeakerId::new("s1"), SpeakerId::new("s2")]);
    assert_eq!(input.status, None);
}

#[tokio::test]
async fn new_speaker_uploads_photo_then_saves_inactive() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_multipart(
            "/speakers/new",
            &[
                ("displayName", "Ada <Lovelace>"),
                ("email", "Ada@Example.com"),
                ("status", "on"),
            ],
            Some(PhotoPart {
                filename: "ada.png",
                content_type: "image/png",
                bytes: &[7, 7, 7],
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/speakers");
    let calls = console.calls();
    let [Call::Upload(filename), Call::CreateSpeaker(input)] = calls.as_slice() else {
        panic!("expected upload then createSpeaker, got {calls:?}");
    };
    assert_eq!(filename, "ada.png");
    assert_eq!(input.display_name, "Ada &lt;Lovelace&gt;");
    assert_eq!(input.email, "ada@example.com");
    assert_eq!(input.status, EntityStatus::Inactive);
    assert_eq!(input.photo_id, Some(FileId::new("f1")));
}

#[tokio::test]
async fn rejected_speaker_keeps_photo_preview_and_typed_text() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_multipart(
            "/speakers/new",
            &[("displayName", "  "), ("organization", "R&amp;D")],
            Some(PhotoPart {
                filename: "ada.png",
                content_type: "image/png",
                bytes: &[7, 7, 7],
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("Display name is empty"));
    assert!(page.contains("src=\"data:image/png;base64,BwcH\""));
    assert!(page.contains("value=\"R&amp;amp;D\""));
    assert!(console.calls().is_empty());
}

#[tokio::test]
async fn unsupported_photo_is_dropped_before_upload() {
    let (app, console) = test_app(FakeConsole::signed_in(UserRole::User));
    let response = app
        .oneshot(post_multipart(
            "/speakers/new",
            &[("displayName", "Ada")],
            Some(PhotoPart {
                filename: "ada.gif",
                content_type: "image/gif",
                bytes: &[7, 7, 7],
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let calls = console.calls();
    let [Call::CreateSpeaker(input)] = calls.as_slice() else {
        panic!("expected a single createSpeaker call, got {calls:?}");
    };
    assert_eq!(input.photo_id, None);
}

#[tokio::test]
async fn speaker_edit_without_file_keeps_existing_photo() {
    let mut console = FakeConsole::signed_in(UserRole::User);
    let mut existing = speaker("s1", 1, EntityStatus::Inactive);
    existing.photo = Some(PhotoRef {
        id: FileId::new("f-old"),
        url: "https://files.example/f-old".to_string(),
    });
    console.speakers = vec![existing];
    let (app, console) = test_app(console);

    let response = app
        .oneshot(post_multipart(
            "/speakers/s1/edit",
            &[("displayName", "Ada"), ("status", "on")],
            None,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/speakers");
    let calls = console.calls();
    let [Call::UpdateSpeaker(id, input)] = calls.as_slice() else {
        panic!("expected a single updateSpeaker call, got {calls:?}");
    };
    assert_eq!(id, &SpeakerId::new("s1"));
    assert_eq!(input.status, EntityStatus::Active);
    assert_eq!(input.photo_id, Some(FileId::new("f-old")));
}
