//! Raw form submissions and their conversion into backend payloads.

use std::borrow::Borrow;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::FixedOffset;
use client_core::FileUpload;
use serde::Deserialize;
use shared::{
    domain::{EntityStatus, Room, RoomId, Speaker, SpeakerId, Talk},
    protocol::{CreateUserInput, RoomInput, SigninInput, SpeakerInput, TalkInput},
};

use crate::{
    orchestrator::FormSubmission,
    sanitize::{
        clean_text, datetime_local_value, normalize_email, parse_event_time, unescape_html,
    },
    store::FieldErrors,
    validation,
};

pub const PHOTO_MAX_BYTES: usize = 1_000_000;
pub const PHOTO_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerForm {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub first_name: String,
    pub last_name: String,
    pub short_description: String,
    pub long_description: String,
    pub active: bool,
}

impl SpeakerForm {
    /// Assigns one multipart text field; returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "displayName" => &mut self.display_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "organization" => &mut self.organization,
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "shortDescription" => &mut self.short_description,
            "longDescription" => &mut self.long_description,
            "status" => {
                self.active = true;
                return true;
            }
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn from_speaker(speaker: &Speaker) -> Self {
        let text = |value: &Option<String>| unescape_html(value.as_deref().unwrap_or_default());
        Self {
            display_name: unescape_html(&speaker.display_name),
            email: text(&speaker.email),
            phone: text(&speaker.phone),
            organization: text(&speaker.organization),
            first_name: text(&speaker.first_name),
            last_name: text(&speaker.last_name),
            short_description: text(&speaker.short_description),
            long_description: text(&speaker.long_description),
            active: speaker.status.is_active(),
        }
    }
}

impl FormSubmission for SpeakerForm {
    type Payload = SpeakerInput;

    fn validate(&self) -> FieldErrors {
        validation::validate_speaker(self)
    }

    fn payload(&self) -> SpeakerInput {
        SpeakerInput {
            display_name: clean_text(&self.display_name),
            email: if self.email.trim().is_empty() {
                String::new()
            } else {
                normalize_email(&self.email)
            },
            phone: self.phone.trim().to_string(),
            organization: clean_text(&self.organization),
            first_name: clean_text(&self.first_name),
            last_name: clean_text(&self.last_name),
            short_description: clean_text(&self.short_description),
            long_description: clean_text(&self.long_description),
            status: EntityStatus::from_checkbox(self.active),
            photo_id: None,
        }
    }
}

/// Keeps an attached photo only when it is a JPEG or PNG within the size limit.
pub fn accept_photo(upload: FileUpload) -> Option<FileUpload> {
    let accepted = !upload.bytes.is_empty()
        && upload.bytes.len() <= PHOTO_MAX_BYTES
        && PHOTO_CONTENT_TYPES.contains(&upload.content_type.as_str());
    accepted.then_some(upload)
}

pub fn photo_preview_url(upload: &FileUpload) -> String {
    format!(
        "data:{};base64,{}",
        upload.content_type,
        STANDARD.encode(&upload.bytes)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkForm {
    pub name: String,
    pub description: String,
    pub starts: String,
    pub ends: String,
    pub room: String,
    pub speakers: Vec<String>,
    /// `None` on the create form, which has no status toggle.
    pub active: Option<bool>,
    pub event_offset: FixedOffset,
}

impl TalkForm {
    pub fn empty(event_offset: FixedOffset) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            starts: String::new(),
            ends: String::new(),
            room: String::new(),
            speakers: Vec::new(),
            active: None,
            event_offset,
        }
    }

    /// Builds the form from url-encoded pairs; every checked speaker arrives as a
    /// separate `speaker` pair.
    pub fn from_pairs<I, K, V>(pairs: I, event_offset: FixedOffset, editing: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Borrow<str>,
        V: Into<String>,
    {
        let mut form = Self::empty(event_offset);
        if editing {
            form.active = Some(false);
        }
        for (key, value) in pairs {
            let value = value.into();
            match key.borrow() {
                "name" => form.name = value,
                "description" => form.description = value,
                "starts" => form.starts = value,
                "ends" => form.ends = value,
                "room" => form.room = value,
                "speaker" if !value.is_empty() && !form.speakers.contains(&value) => {
                    form.speakers.push(value)
                }
                "status" if editing => form.active = Some(true),
                _ => {}
            }
        }
        form
    }

    pub fn from_talk(talk: &Talk, event_offset: FixedOffset) -> Self {
        Self {
            name: unescape_html(&talk.name),
            description: unescape_html(talk.description.as_deref().unwrap_or_default()),
            starts: talk
                .starts
                .map(|time| datetime_local_value(&time, event_offset))
                .unwrap_or_default(),
            ends: talk
                .ends
                .map(|time| datetime_local_value(&time, event_offset))
                .unwrap_or_default(),
            room: talk
                .room
                .as_ref()
                .map(|room| room.id.to_string())
                .unwrap_or_default(),
            speakers: talk.speakers.iter().map(|speaker| speaker.id.to_string()).collect(),
            active: Some(talk.status.is_active()),
            event_offset,
        }
    }

    pub fn has_speaker(&self, id: &SpeakerId) -> bool {
        self.speakers.iter().any(|speaker| speaker == id.as_str())
    }

    fn timestamp(&self, raw: &str) -> Option<String> {
        parse_event_time(raw, self.event_offset).map(|time| time.to_rfc3339())
    }
}

impl FormSubmission for TalkForm {
    type Payload = TalkInput;

    fn validate(&self) -> FieldErrors {
        validation::validate_talk(self)
    }

    fn payload(&self) -> TalkInput {
        let room = self.room.trim();
        TalkInput {
            name: clean_text(&self.name),
            description: clean_text(&self.description),
            starts: self.timestamp(&self.starts),
            ends: self.timestamp(&self.ends),
            room: (!room.is_empty()).then(|| RoomId::new(room)),
            speakers: self.speakers.iter().map(SpeakerId::new).collect(),
            status: self.active.map(EntityStatus::from_checkbox),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomForm {
    pub name: String,
    pub capacity: String,
}

impl RoomForm {
    pub fn from_room(room: &Room) -> Self {
        Self {
            name: unescape_html(&room.name),
            capacity: room.capacity.to_string(),
        }
    }
}

impl FormSubmission for RoomForm {
    type Payload = RoomInput;

    fn validate(&self) -> FieldErrors {
        validation::validate_room(self)
    }

    fn payload(&self) -> RoomInput {
        RoomInput {
            name: clean_text(&self.name),
            capacity: self.capacity.trim().parse().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FormSubmission for LoginForm {
    type Payload = SigninInput;

    fn validate(&self) -> FieldErrors {
        validation::validate_login(self)
    }

    fn payload(&self) -> SigninInput {
        SigninInput {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_again: String,
}

impl FormSubmission for RegistrationForm {
    type Payload = CreateUserInput;

    fn validate(&self) -> FieldErrors {
        validation::validate_registration(self)
    }

    fn payload(&self) -> CreateUserInput {
        CreateUserInput {
            name: clean_text(&self.name),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
