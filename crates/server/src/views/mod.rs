//! HTML rendering. Stored free text is already escaped and goes through
//! [`escape_html_once`]; form field values hold what the user typed and are
//! escaped in full.

use std::fmt::Write as _;

use console_core::{
    sanitize::{escape_html, escape_html_once},
    store::{Extras, FormState},
};
use shared::{domain::User, error::ErrorCode};

pub(crate) mod auth;
pub(crate) mod rooms;
pub(crate) mod speakers;
pub(crate) mod talks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Home,
    Speakers,
    Talks,
    Rooms,
    Admin,
}

pub(crate) fn text(raw: &str) -> String {
    escape_html_once(raw)
}

/// Full document with the navigation menu for `user`, or a bare page for
/// anonymous visitors.
pub(crate) fn layout(title: &str, user: Option<&User>, section: Section, body: &str) -> String {
    let nav = user.map(|user| nav_menu(user, section)).unwrap_or_default();
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} | HCPP Administration</title></head>\n<body>\n{nav}<main class=\"container\">\n{body}</main>\n</body>\n</html>\n",
        title = text(title),
    )
}

fn nav_menu(user: &User, section: Section) -> String {
    let item = |href: &str, label: &str, item_section: Section| {
        let class = if item_section == section { " class=\"active\"" } else { "" };
        format!("<a href=\"{href}\"{class}>{label}</a>")
    };
    let mut nav = String::from("<nav class=\"menu\">\n<span class=\"brand\">HCPP Administration</span>\n");
    for (href, label, item_section) in [
        ("/", "Home", Section::Home),
        ("/speakers", "Speakers", Section::Speakers),
        ("/talks", "Talks", Section::Talks),
        ("/rooms", "Rooms", Section::Rooms),
    ] {
        let _ = writeln!(nav, "{}", item(href, label, item_section));
    }
    if user.is_manager() {
        let _ = writeln!(nav, "{}", item("/create-user", "Create user", Section::Admin));
    }
    let _ = writeln!(
        nav,
        "<span class=\"user\">{}</span>\n<a href=\"/logout\">Log out</a>",
        text(&user.name)
    );
    nav.push_str("</nav>\n");
    nav
}

pub(crate) fn error_page(user: Option<&User>, code: ErrorCode, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back to dashboard</a></p>\n",
        heading_for(code),
        text(message)
    );
    layout(heading_for(code), user, Section::Home, &body)
}

fn heading_for(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::NotFound => "Not found",
        ErrorCode::Forbidden => "Not allowed",
        ErrorCode::Unauthorized => "Signed out",
        ErrorCode::Validation => "Rejected",
        ErrorCode::Unavailable => "Backend unavailable",
        ErrorCode::Internal => "Something went wrong",
    }
}

pub(crate) fn dashboard(
    user: &User,
    active_speakers: usize,
    total_speakers: usize,
    active_talks: usize,
    total_talks: usize,
) -> String {
    let body = format!(
        "<h1>Dashboard</h1>\n<div class=\"statistics\">\n<div class=\"statistic\"><strong>{active_speakers}/{total_speakers}</strong> Active Speakers</div>\n<div class=\"statistic\"><strong>{active_talks}/{total_talks}</strong> Active Talks</div>\n</div>\n"
    );
    layout("Dashboard", Some(user), Section::Home, &body)
}

/// Banner listing every published error; empty when the form is clean.
pub(crate) fn error_banner<X: Extras>(store: &FormState<X>) -> String {
    if !store.error() {
        return String::new();
    }
    let mut banner = String::from("<div class=\"message error\">\n<ul>\n");
    for message in store.field_errors().values() {
        let _ = writeln!(banner, "<li>{}</li>", text(message));
    }
    banner.push_str("</ul>\n</div>\n");
    banner
}

pub(crate) fn form_open<X: Extras>(action: &str, multipart: bool, store: &FormState<X>) -> String {
    let enctype = if multipart {
        " enctype=\"multipart/form-data\""
    } else {
        ""
    };
    let class = if store.loading() { "form loading" } else { "form" };
    format!("<form method=\"post\" action=\"{action}\"{enctype} class=\"{class}\">\n")
}

pub(crate) struct Input<'a> {
    pub label: &'a str,
    pub name: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
}

pub(crate) fn input<X: Extras>(field: Input<'_>, store: &FormState<X>) -> String {
    let error = store.field_error(field.name);
    format!(
        "<div class=\"field{}\">\n<label for=\"{name}\">{label}</label>\n<input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\">\n{}</div>\n",
        if error.is_some() { " error" } else { "" },
        field_error(error),
        name = field.name,
        label = field.label,
        kind = field.kind,
        value = escape_html(field.value),
    )
}

pub(crate) fn textarea<X: Extras>(label: &str, name: &str, value: &str, store: &FormState<X>) -> String {
    let error = store.field_error(name);
    format!(
        "<div class=\"field{}\">\n<label for=\"{name}\">{label}</label>\n<textarea id=\"{name}\" name=\"{name}\">{}</textarea>\n{}</div>\n",
        if error.is_some() { " error" } else { "" },
        escape_html(value),
        field_error(error),
    )
}

pub(crate) fn checkbox(label: &str, name: &str, value: &str, checked: bool) -> String {
    format!(
        "<div class=\"field checkbox\"><label><input type=\"checkbox\" name=\"{name}\" value=\"{value}\"{}> {}</label></div>\n",
        if checked { " checked" } else { "" },
        text(label),
        value = text(value),
    )
}

fn field_error(error: Option<&str>) -> String {
    error
        .map(|message| format!("<div class=\"prompt\">{}</div>\n", text(message)))
        .unwrap_or_default()
}

pub(crate) fn submit_button(label: &str) -> String {
    format!("<button type=\"submit\" class=\"primary\">{label}</button>\n</form>\n")
}

/// Confirmation dialog shown while a delete is pending.
pub(crate) fn delete_modal(kind: &str, list_path: &str, id: &str) -> String {
    format!(
        "<div class=\"modal\" role=\"dialog\">\n<h2>Delete {kind}</h2>\n<p>Are you sure you want to delete this {kind}?</p>\n<form method=\"post\" action=\"{list_path}/{id}/delete\">\n<a class=\"button negative\" href=\"{list_path}\">No</a>\n<button type=\"submit\" class=\"positive\">Yes</button>\n</form>\n</div>\n",
        id = text(id),
    )
}

pub(crate) fn status_label(active: bool) -> &'static str {
    if active {
        "<span class=\"label green\">ACTIVE</span>"
    } else {
        "<span class=\"label\">INACTIVE</span>"
    }
}
