//! GraphQL documents sent to the hosted backend.

pub const CURRENT_USER: &str = r#"query getUser {
  user { id name email role }
}"#;

pub const SIGNIN_USER: &str = r#"mutation Signin($email: String!, $password: String!) {
  signinUser(email: { email: $email, password: $password }) { token }
}"#;

pub const CREATE_USER: &str = r#"mutation Create($name: String!, $email: String!, $password: String!) {
  createUser(name: $name, role: USER, authProvider: { email: { email: $email, password: $password } }) { id }
}"#;

/// Account creation and sign-in in one document; the mutations run in order.
pub const REGISTER_USER: &str = r#"mutation Register($name: String!, $email: String!, $password: String!) {
  createUser(name: $name, role: USER, authProvider: { email: { email: $email, password: $password } }) { id }
  signinUser(email: { email: $email, password: $password }) { token }
}"#;

pub const ALL_SPEAKERS: &str = r#"query speakersQuery {
  allSpeakers(orderBy: position_ASC) {
    id position email phone firstName lastName displayName organization
    status shortDescription longDescription
    photo { id url }
  }
}"#;

pub const ONE_SPEAKER: &str = r#"query oneSpeaker($id: ID!) {
  Speaker(id: $id) {
    id position email phone firstName lastName displayName organization
    status shortDescription longDescription
    photo { id url }
  }
}"#;

pub const CREATE_SPEAKER: &str = r#"mutation createSpeaker($displayName: String!, $email: String, $phone: String, $organization: String, $firstName: String, $lastName: String, $shortDescription: String, $longDescription: String, $status: SpeakerStatus!, $photoId: ID) {
  createSpeaker(displayName: $displayName, email: $email, phone: $phone, organization: $organization, firstName: $firstName, lastName: $lastName, shortDescription: $shortDescription, longDescription: $longDescription, status: $status, photoId: $photoId) { id }
}"#;

pub const UPDATE_SPEAKER: &str = r#"mutation updateSpeaker($id: ID!, $displayName: String!, $email: String, $phone: String, $organization: String, $firstName: String, $lastName: String, $shortDescription: String, $longDescription: String, $status: SpeakerStatus!, $photoId: ID) {
  updateSpeaker(id: $id, displayName: $displayName, email: $email, phone: $phone, organization: $organization, firstName: $firstName, lastName: $lastName, shortDescription: $shortDescription, longDescription: $longDescription, status: $status, photoId: $photoId) { id }
}"#;

pub const UPDATE_SPEAKER_POSITION: &str = r#"mutation updateSpeakerPosition($id: ID!, $position: Int!) {
  updateSpeaker(id: $id, position: $position) { id position }
}"#;

pub const DELETE_SPEAKER: &str = r#"mutation deleteSpeaker($id: ID!) {
  deleteSpeaker(id: $id) { id }
}"#;

pub const ALL_TALKS: &str = r#"query talksQuery {
  allTalks(orderBy: starts_ASC) {
    id name description starts ends status
    room { id name }
    speakers { id displayName }
  }
}"#;

pub const ONE_TALK: &str = r#"query oneTalk($id: ID!) {
  Talk(id: $id) {
    id name description starts ends status
    room { id name }
    speakers { id displayName }
  }
}"#;

pub const CREATE_TALK: &str = r#"mutation createTalk($name: String!, $description: String, $starts: DateTime, $ends: DateTime, $room: ID, $speakers: [ID!]) {
  createTalk(name: $name, description: $description, starts: $starts, ends: $ends, roomId: $room, speakersIds: $speakers, status: INACTIVE) { id }
}"#;

pub const UPDATE_TALK: &str = r#"mutation updateTalk($id: ID!, $name: String!, $description: String, $starts: DateTime, $ends: DateTime, $room: ID, $speakers: [ID!], $status: TalkStatus!) {
  updateTalk(id: $id, name: $name, description: $description, starts: $starts, ends: $ends, roomId: $room, speakersIds: $speakers, status: $status) { id }
}"#;

pub const DELETE_TALK: &str = r#"mutation deleteTalk($id: ID!) {
  deleteTalk(id: $id) { id }
}"#;

pub const ALL_ROOMS: &str = r#"query roomsQuery {
  allRooms { id name capacity }
}"#;

pub const ONE_ROOM: &str = r#"query oneRoom($id: ID!) {
  Room(id: $id) { id name capacity }
}"#;

pub const CREATE_ROOM: &str = r#"mutation createRoom($name: String!, $capacity: Int!) {
  createRoom(name: $name, capacity: $capacity) { id }
}"#;

pub const UPDATE_ROOM: &str = r#"mutation updateRoom($id: ID!, $name: String!, $capacity: Int!) {
  updateRoom(id: $id, name: $name, capacity: $capacity) { id }
}"#;

pub const DELETE_ROOM: &str = r#"mutation deleteRoom($id: ID!) {
  deleteRoom(id: $id) { id }
}"#;
