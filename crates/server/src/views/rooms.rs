use std::fmt::Write as _;

use console_core::{forms::RoomForm, store::RoomFormState};
use shared::domain::{Room, User};

use super::{delete_modal, error_banner, form_open, input, layout, submit_button, text, Input, Section};

pub(crate) fn list(user: &User, rooms: &[Room], store: &RoomFormState) -> String {
    let mut body = String::from(
        "<h1>Rooms</h1>\n<p><a class=\"button primary\" href=\"/rooms/new\">Add room</a></p>\n",
    );
    body.push_str("<table>\n<thead><tr><th>Name</th><th>Capacity</th><th></th></tr></thead>\n<tbody>\n");
    for room in rooms {
        let _ = writeln!(
            body,
            "<tr><td>{name}</td><td>{capacity}</td><td><a class=\"button primary\" href=\"/rooms/{id}/edit\">Edit</a> <a class=\"button negative\" href=\"/rooms?delete={id}\">Delete</a></td></tr>",
            name = text(&room.name),
            capacity = room.capacity,
            id = text(room.id.as_str()),
        );
    }
    body.push_str("</tbody>\n</table>\n");
    if let Some(id) = store.pending_delete_id() {
        body.push_str(&delete_modal("room", "/rooms", id.as_str()));
    }
    layout("Rooms", Some(user), Section::Rooms, &body)
}

/// `action` is the form's own path, `/rooms/new` or `/rooms/:id/edit`.
pub(crate) fn form(user: &User, action: &str, form: &RoomForm, store: &RoomFormState) -> String {
    let title = if action.ends_with("/new") { "New room" } else { "Edit room" };
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
    body.push_str(&input(
        Input {
            label: "Capacity",
            name: "capacity",
            kind: "number",
            value: &form.capacity,
        },
        store,
    ));
    body.push_str(&submit_button("Save"));
    layout(title, Some(user), Section::Rooms, &body)
}
