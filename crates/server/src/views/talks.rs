use std::fmt::Write as _;

use chrono::FixedOffset;
use console_core::{forms::TalkForm, store::TalkFormState};
use shared::domain::{Room, Speaker, Talk, User};

use super::{
    checkbox, delete_modal, error_banner, form_open, input, layout, status_label, submit_button,
    text, textarea, Input, Section,
};

const LIST_TIME_FORMAT: &str = "%d. %m. %Y - %H:%M";

pub(crate) fn list(user: &User, talks: &[Talk], offset: FixedOffset, store: &TalkFormState) -> String {
    let mut body = String::from(
        "<h1>Talks</h1>\n<p><a class=\"button primary\" href=\"/talks/new\">Add talk</a></p>\n",
    );
    body.push_str("<table>\n<thead><tr><th>Status</th><th>Name</th><th>Starts</th><th>Ends</th><th>Room</th><th>Speakers</th><th></th></tr></thead>\n<tbody>\n");
    for talk in talks {
        let when = |time: Option<chrono::DateTime<chrono::Utc>>| {
            time.map(|time| time.with_timezone(&offset).format(LIST_TIME_FORMAT).to_string())
                .unwrap_or_default()
        };
        let room = talk
            .room
            .as_ref()
            .and_then(|room| room.name.as_deref())
            .map(text)
            .unwrap_or_default();
        let speakers = talk
            .speakers
            .iter()
            .filter_map(|speaker| speaker.display_name.as_deref())
            .map(text)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            body,
            "<tr><td>{status}</td><td>{name}</td><td>{starts}</td><td>{ends}</td><td>{room}</td><td>{speakers}</td><td><a class=\"button primary\" href=\"/talks/{id}/edit\">Edit</a> <a class=\"button negative\" href=\"/talks?delete={id}\">Delete</a></td></tr>",
            status = status_label(talk.status.is_active()),
            name = text(&talk.name),
            starts = when(talk.starts),
            ends = when(talk.ends),
            id = text(talk.id.as_str()),
        );
    }
    body.push_str("</tbody>\n</table>\n");
    if let Some(id) = store.pending_delete_id() {
        body.push_str(&delete_modal("talk", "/talks", id.as_str()));
    }
    layout("Talks", Some(user), Section::Talks, &body)
}

/// `speakers` are listed in the given order; callers sort them by display name.
pub(crate) fn form(
    user: &User,
    action: &str,
    form: &TalkForm,
    rooms: &[Room],
    speakers: &[Speaker],
    store: &TalkFormState,
) -> String {
    let editing = form.active.is_some();
    let title = if editing { "Edit talk" } else { "New talk" };
    let mut body = format!("<h1>{title}</h1>\n");
    body.push_str(&error_banner(store));
    body.push_str(&form_open(action, false, store));
    body.push_str(&input(
        Input {
            label: "Name",
            name: "name",
            kind: "text",
            value: &form.name,
        },
        store,
    ));
    body.push_str(&textarea("Description", "description", &form.description, store));
    body.push_str(&input(
        Input {
            label: "Starts",
            name: "starts",
            kind: "datetime-local",
            value: &form.starts,
        },
        store,
    ));
    body.push_str(&input(
        Input {
            label: "Ends",
            name: "ends",
            kind: "datetime-local",
            value: &form.ends,
        },
        store,
    ));

    body.push_str("<div class=\"field\">\n<label for=\"room\">Room</label>\n<select id=\"room\" name=\"room\">\n<option value=\"\"></option>\n");
    for room in rooms {
        let selected = if form.room == room.id.as_str() { " selected" } else { "" };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{selected}>{}</option>",
            text(room.id.as_str()),
            text(&room.option_label())
        );
    }
    body.push_str("</select>\n</div>\n");

    body.push_str("<fieldset>\n<legend>Speakers</legend>\n");
    for speaker in speakers {
        body.push_str(&checkbox(
            &speaker.display_name,
            "speaker",
            speaker.id.as_str(),
            form.has_speaker(&speaker.id),
        ));
    }
    body.push_str("</fieldset>\n");

    if let Some(active) = form.active {
        body.push_str(&checkbox("Active", "status", "on", active));
    }
    body.push_str(&submit_button("Save"));
    layout(title, Some(user), Section::Talks, &body)
}
