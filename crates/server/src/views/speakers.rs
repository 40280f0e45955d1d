use std::fmt::Write as _;

use console_core::{forms::SpeakerForm, reorder::availability, store::SpeakerFormState};
use shared::domain::{PhotoRef, Speaker, User};

use super::{
    checkbox, delete_modal, error_banner, form_open, input, layout, status_label, submit_button,
    text, textarea, Input, Section,
};

const AVATAR_PLACEHOLDER: &str = "/static/images/speaker-avatar.png";

/// `speakers` must already be sorted by position.
pub(crate) fn list(user: &User, speakers: &[Speaker], store: &SpeakerFormState) -> String {
    let mut body = String::from(
        "<h1>Speakers</h1>\n<p><a class=\"button primary\" href=\"/speakers/new\">Add speaker</a></p>\n",
    );
    body.push_str("<table>\n<thead><tr><th></th><th></th><th>Status</th><th>Name</th><th>E-mail</th><th>Bio</th><th></th></tr></thead>\n<tbody>\n");
    for (index, speaker) in speakers.iter().enumerate() {
        let id = text(speaker.id.as_str());
        let moves = availability(index, speakers.len());
        let mut controls = String::new();
        if moves.up {
            let _ = write!(
                controls,
                "<form method=\"post\" action=\"/speakers/{id}/move-up\"><button type=\"submit\" title=\"Move up\">&uarr;</button></form>"
            );
        }
        if moves.down {
            let _ = write!(
                controls,
                "<form method=\"post\" action=\"/speakers/{id}/move-down\"><button type=\"submit\" title=\"Move down\">&darr;</button></form>"
            );
        }
        let photo = match &speaker.photo {
            Some(photo) => format!(
                "<img src=\"{}\" alt=\"{}\" width=\"40\">",
                text(&photo.url),
                text(&speaker.display_name)
            ),
            None => format!("<img src=\"{AVATAR_PLACEHOLDER}\" alt=\"\" width=\"40\">"),
        };
        let email = speaker
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .map(|email| format!("<a href=\"mailto:{0}\">{0}</a>", text(email)))
            .unwrap_or_default();
        let _ = writeln!(
            body,
            "<tr><td>{controls}</td><td>{photo}</td><td>{status}</td><td>{name}</td><td>{email}</td><td>{bio}</td><td><a class=\"button primary\" href=\"/speakers/{id}/edit\">Edit</a> <a class=\"button negative\" href=\"/speakers?delete={id}\">Delete</a></td></tr>",
            status = status_label(speaker.status.is_active()),
            name = text(&speaker.display_name),
            bio = text(speaker.short_description.as_deref().unwrap_or_default()),
        );
    }
    body.push_str("</tbody>\n</table>\n");
    if let Some(id) = store.pending_delete_id() {
        body.push_str(&delete_modal("speaker", "/speakers", id.as_str()));
    }
    layout("Speakers", Some(user), Section::Speakers, &body)
}

/// `existing_photo` is set when editing a speaker that already has one; the
/// status toggle only exists on the edit form.
pub(crate) fn form(
    user: &User,
    action: &str,
    form: &SpeakerForm,
    existing_photo: Option<&PhotoRef>,
    editing: bool,
    store: &SpeakerFormState,
) -> String {
    let title = if editing { "Edit speaker" } else { "New speaker" };
    let mut body = format!("<h1>{title}</h1>\n");
    body.push_str(&error_banner(store));
    body.push_str(&form_open(action, true, store));

    let preview = if !store.photo_preview().is_empty() {
        Some(store.photo_preview().to_string())
    } else {
        existing_photo.map(|photo| text(&photo.url))
    };
    body.push_str("<div class=\"field photo\">\n<label for=\"photo\">Photo (JPEG or PNG, up to 1 MB)</label>\n");
    if let Some(src) = preview {
        let _ = writeln!(body, "<img src=\"{src}\" alt=\"\" width=\"120\">");
    }
    body.push_str("<input id=\"photo\" name=\"photo\" type=\"file\" accept=\"image/jpeg,image/png\">\n</div>\n");

    for (label, name, kind, value) in [
        ("Display name", "displayName", "text", form.display_name.as_str()),
        ("First name", "firstName", "text", form.first_name.as_str()),
        ("Last name", "lastName", "text", form.last_name.as_str()),
        ("E-mail", "email", "email", form.email.as_str()),
        ("Phone", "phone", "tel", form.phone.as_str()),
        ("Organization", "organization", "text", form.organization.as_str()),
    ] {
        body.push_str(&input(
            Input {
                label,
                name,
                kind,
                value,
            },
            store,
        ));
    }
    body.push_str(&textarea(
        "Short description",
        "shortDescription",
        &form.short_description,
        store,
    ));
    body.push_str(&textarea(
        "Long description",
        "longDescription",
        &form.long_description,
        store,
    ));
    if editing {
        body.push_str(&checkbox("Active", "status", "on", form.active));
    }
    body.push_str(&submit_button("Save"));
    layout(title, Some(user), Section::Speakers, &body)
}
