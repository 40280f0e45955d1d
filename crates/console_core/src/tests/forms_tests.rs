use chrono::{TimeZone, Utc};
use shared::domain::{EntityStatus, RoomRef, SpeakerRef, TalkId};

use super::*;

fn prague() -> FixedOffset {
    FixedOffset::east_opt(3600).expect("offset")
}

fn upload(content_type: &str, size: usize) -> FileUpload {
    FileUpload {
        filename: "photo".to_string(),
        content_type: content_type.to_string(),
        bytes: vec![7; size],
    }
}

#[test]
fn speaker_payload_is_escaped_and_normalized() {
    let mut form = SpeakerForm::default();
    assert!(form.set_field("displayName", "  <Ada>  ".to_string()));
    assert!(form.set_field("email", "Ada.L+cfp@gmail.com".to_string()));
    assert!(form.set_field("organization", "R&D".to_string()));
    assert!(!form.set_field("photo", "ignored".to_string()));

    let payload = form.payload();
    assert_eq!(payload.display_name, "&lt;Ada&gt;");
    assert_eq!(payload.email, "adal@gmail.com");
    assert_eq!(payload.organization, "R&amp;D");
    assert_eq!(payload.status, EntityStatus::Inactive);
    assert_eq!(payload.photo_id, None);
}

#[test]
fn checked_status_makes_speaker_active() {
    let mut form = SpeakerForm::default();
    form.set_field("status", "on".to_string());
    assert_eq!(form.payload().status, EntityStatus::Active);
}

#[test]
fn photo_must_be_small_jpeg_or_png() {
    assert!(accept_photo(upload("image/png", 10)).is_some());
    assert!(accept_photo(upload("image/jpeg", PHOTO_MAX_BYTES)).is_some());
    assert!(accept_photo(upload("image/jpeg", PHOTO_MAX_BYTES + 1)).is_none());
    assert!(accept_photo(upload("image/gif", 10)).is_none());
    assert!(accept_photo(upload("image/png", 0)).is_none());
}

#[test]
fn preview_is_a_data_url() {
    let preview = photo_preview_url(&upload("image/png", 3));
    assert_eq!(preview, "data:image/png;base64,BwcH");
}

#[test]
fn talk_pairs_collect_repeated_speakers() {
    let pairs = [
        ("name", "Keynote"),
        ("starts", "2017-09-01T10:00"),
        ("room", "r1"),
        ("speaker", "s1"),
        ("speaker", "s2"),
        ("speaker", "s1"),
        ("status", "on"),
    ];
    let form = TalkForm::from_pairs(pairs, prague(), false);
    assert_eq!(form.speakers, vec!["s1".to_string(), "s2".to_string()]);
    assert_eq!(form.active, None);

    let payload = form.payload();
    assert_eq!(payload.starts.as_deref(), Some("2017-09-01T10:00:00+01:00"));
    assert_eq!(payload.ends, None);
    assert_eq!(payload.room, Some(RoomId::new("r1")));
    assert_eq!(payload.speakers.len(), 2);
    assert_eq!(payload.status, None);
}

#[test]
fn editing_talk_reads_status_checkbox() {
    let unchecked = TalkForm::from_pairs([("name", "Keynote")], prague(), true);
    assert_eq!(unchecked.payload().status, Some(EntityStatus::Inactive));

    let checked = TalkForm::from_pairs([("name", "Keynote"), ("status", "on")], prague(), true);
    assert_eq!(checked.payload().status, Some(EntityStatus::Active));
}

#[test]
fn talk_prefill_shows_times_in_event_offset() {
    let talk = Talk {
        id: TalkId::new("t1"),
        name: "Keynote".to_string(),
        description: None,
        starts: Some(Utc.with_ymd_and_hms(2017, 9, 1, 8, 0, 0).unwrap()),
        ends: None,
        status: EntityStatus::Active,
        room: Some(RoomRef {
            id: RoomId::new("r1"),
            name: Some("Hall A".to_string()),
        }),
        speakers: vec![SpeakerRef {
            id: SpeakerId::new("s1"),
            display_name: None,
        }],
    };
    let form = TalkForm::from_talk(&talk, prague());
    assert_eq!(form.starts, "2017-09-01T09:00");
    assert_eq!(form.ends, "");
    assert_eq!(form.room, "r1");
    assert!(form.has_speaker(&SpeakerId::new("s1")));
    assert_eq!(form.active, Some(true));
}

#[test]
fn room_payload_parses_capacity() {
    let form = RoomForm {
        name: " Hall A ".to_string(),
        capacity: "120".to_string(),
    };
    let payload = form.payload();
    assert_eq!(payload.name, "Hall A");
    assert_eq!(payload.capacity, 120);
}

#[test]
fn editing_stored_text_saves_it_unchanged() {
    let room = Room {
        id: RoomId::new("r1"),
        name: "Q&amp;A &lt;main&gt;".to_string(),
        capacity: 80,
    };
    let form = RoomForm::from_room(&room);
    assert_eq!(form.name, "Q&A <main>");
    assert_eq!(form.payload().name, room.name);
}

#[test]
fn room_payload_reads_zero_padded_capacity() {
    let form = RoomForm {
        name: "Hall A".to_string(),
        capacity: "0120".to_string(),
    };
    assert!(form.validate().is_empty());
    assert_eq!(form.payload().capacity, 120);
}

#[test]
fn registration_payload_trims_email_and_keeps_password() {
    let form = RegistrationForm {
        name: "Ada <3".to_string(),
        email: " Ada@Example.com ".to_string(),
        password: " secret ".to_string(),
        password_again: " secret ".to_string(),
    };
    let payload = form.payload();
    assert_eq!(payload.name, "Ada &lt;3");
    assert_eq!(payload.email, "Ada@Example.com");
    assert_eq!(payload.password, " secret ");
}
