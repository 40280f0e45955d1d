//! Field checks for every form. Validators never fail and never touch their input;
//! an empty mapping means the form may be submitted.

use std::sync::LazyLock;

use chrono::{Offset, Utc};
use regex::Regex;

use crate::{
    forms::{LoginForm, RegistrationForm, RoomForm, SpeakerForm, TalkForm},
    sanitize::parse_event_time,
    store::FieldErrors,
};

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern"));

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("integer pattern"));

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    value.len() <= 254 && EMAIL.is_match(value)
}

/// Mobile number in any national format: separators are ignored, a leading `+`
/// is allowed, and 7 to 15 digits must remain.
pub fn is_mobile_phone(value: &str) -> bool {
    let compact: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    PHONE.is_match(&compact)
}

pub fn is_int(value: &str) -> bool {
    INTEGER.is_match(value.trim())
}

pub fn is_iso8601(value: &str) -> bool {
    parse_event_time(value, Utc.fix()).is_some()
}

fn insert(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.insert(field.to_string(), message.to_string());
}

pub fn validate_speaker(form: &SpeakerForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(&form.display_name) {
        insert(&mut errors, "displayName", "Display name is empty");
    }
    if !is_blank(&form.email) && !is_email(&form.email) {
        insert(&mut errors, "email", "E-mail is not valid");
    }
    if !is_blank(&form.phone) && !is_mobile_phone(&form.phone) {
        insert(&mut errors, "phone", "Phone number is not valid");
    }
    errors
}

/// Start and end are checked on their own; their order is not compared.
pub fn validate_talk(form: &TalkForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(&form.name) {
        insert(&mut errors, "name", "Name is empty");
    }
    if !is_blank(&form.starts) && !is_iso8601(&form.starts) {
        insert(&mut errors, "starts", "Invalid start date");
    }
    if !is_blank(&form.ends) && !is_iso8601(&form.ends) {
        insert(&mut errors, "ends", "Invalid end date");
    }
    errors
}

pub fn validate_room(form: &RoomForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(&form.name) {
        insert(&mut errors, "name", "Name is empty");
    }
    if !is_int(&form.capacity) {
        insert(&mut errors, "capacity", "Capacity has to be a number");
        return errors;
    }
    match form.capacity.trim().parse::<i64>() {
        Ok(capacity) if capacity < 0 => {
            insert(&mut errors, "capacity", "Capacity cannot be negative");
        }
        Ok(capacity) if u32::try_from(capacity).is_ok() => {}
        _ => insert(&mut errors, "capacity", "Capacity is too large"),
    }
    errors
}

pub fn validate_registration(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(&form.name) {
        insert(&mut errors, "name", "Please fill out your name");
    }
    if !is_email(&form.email) {
        insert(&mut errors, "email", "E-mail is invalid");
    }
    if form.password.chars().count() < MIN_PASSWORD_CHARS {
        insert(
            &mut errors,
            "password",
            "Password requires minimum of 6 characters",
        );
    }
    if form.password != form.password_again {
        insert(&mut errors, "passwordAgain", "Passwords do not match");
    }
    errors
}

pub fn validate_login(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_email(&form.email) {
        insert(&mut errors, "email", "E-mail is invalid");
    }
    if form.password.is_empty() {
        insert(&mut errors, "password", "Password required");
    }
    errors
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
