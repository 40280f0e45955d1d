use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use chrono::FixedOffset;
use tracing::warn;

const ENV_PREFIX: &str = "CONSOLE__";

const KEYS: [&str; 6] = [
    "bind_addr",
    "graphql_url",
    "file_upload_url",
    "event_utc_offset",
    "request_timeout_secs",
    "cookie_secure",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub graphql_url: String,
    pub file_upload_url: String,
    pub event_utc_offset: String,
    pub request_timeout_secs: u64,
    pub cookie_secure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            graphql_url: "http://127.0.0.1:60000/graphql".into(),
            file_upload_url: "http://127.0.0.1:60000/files".into(),
            event_utc_offset: "+01:00".into(),
            request_timeout_secs: 10,
            cookie_secure: false,
        }
    }
}

impl Settings {
    pub fn event_offset(&self) -> anyhow::Result<FixedOffset> {
        parse_utc_offset(&self.event_utc_offset)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn apply(&mut self, key: &str, value: String) {
        match key {
            "bind_addr" => self.bind_addr = value,
            "graphql_url" => self.graphql_url = value,
            "file_upload_url" => self.file_upload_url = value,
            "event_utc_offset" => self.event_utc_offset = value,
            "request_timeout_secs" => match value.trim().parse() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => warn!(%key, %value, "ignoring invalid setting"),
            },
            "cookie_secure" => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.cookie_secure = true,
                "0" | "false" | "no" => self.cookie_secure = false,
                _ => warn!(%key, %value, "ignoring invalid setting"),
            },
            _ => {}
        }
    }
}

/// Defaults, then `path` when it exists, then `CONSOLE__*` environment variables.
pub fn load_settings(path: &Path) -> Settings {
    let file = fs::read_to_string(path).ok();
    settings_from_sources(file.as_deref(), |name| std::env::var(name).ok())
}

pub(crate) fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                for key in KEYS {
                    if let Some(value) = file_cfg.get(key).and_then(scalar) {
                        settings.apply(key, value);
                    }
                }
            }
            Err(error) => warn!(%error, "ignoring unreadable config file"),
        }
    }

    for key in KEYS {
        let name = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
        if let Some(value) = env(&name) {
            settings.apply(key, value);
        }
    }

    settings
}

fn scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Integer(number) => Some(number.to_string()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Parses `Z`, `+HH:MM`, `-HH:MM` or `+HHMM`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("zero offset");
    }

    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => bail!("utc offset '{raw}' must start with + or -"),
    };
    let digits = rest.replace(':', "");
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("utc offset '{raw}' must look like +HH:MM");
    }
    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;
    if hours > 14 || minutes > 59 {
        bail!("utc offset '{raw}' is out of range");
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("utc offset '{raw}' is out of range"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
