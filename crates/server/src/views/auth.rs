use console_core::{
    forms::{LoginForm, RegistrationForm},
    store::{LoginFormState, RegisterFormState},
};
use shared::domain::User;

use super::{error_banner, form_open, input, layout, submit_button, Input, Section};

pub(crate) fn login(form: &LoginForm, store: &LoginFormState) -> String {
    let mut body = String::from("<h1>Log in</h1>\n");
    body.push_str(&error_banner(store));
    body.push_str(&form_open("/login", false, store));
    body.push_str(&input(
        Input {
            label: "E-mail",
            name: "email",
            kind: "email",
            value: &form.email,
        },
        store,
    ));
    body.push_str(&input(
        Input {
            label: "Password",
            name: "password",
            kind: "password",
            value: "",
        },
        store,
    ));
    body.push_str(&submit_button("Log in"));
    body.push_str("<p>No account yet? <a href=\"/register\">Register</a></p>\n");
    layout("Log in", None, Section::Home, &body)
}

/// Registration and manager-driven account creation share one form.
pub(crate) fn registration(
    form: &RegistrationForm,
    store: &RegisterFormState,
    manager: Option<&User>,
) -> String {
    let (title, action, button) = match manager {
        Some(_) => ("Create user", "/create-user", "Create user"),
        None => ("Register", "/register", "Register"),
    };
    let mut body = format!("<h1>{title}</h1>\n");
    body.push_str(&error_banner(store));
    body.push_str(&form_open(action, false, store));
    for (label, name, kind, value) in [
        ("Name", "name", "text", form.name.as_str()),
        ("E-mail", "email", "email", form.email.as_str()),
        ("Password", "password", "password", ""),
        ("Password again", "passwordAgain", "password", ""),
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
    body.push_str(&submit_button(button));
    if manager.is_none() {
        body.push_str("<p>Already registered? <a href=\"/login\">Log in</a></p>\n");
    }
    layout(title, manager, Section::Admin, &body)
}
