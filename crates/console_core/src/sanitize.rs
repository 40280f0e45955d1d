//! Payload cleanup applied after validation and escaping used by the views.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

const ENTITIES: [(&str, char); 8] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#x27;", '\''),
    ("&#x2F;", '/'),
    ("&#x5C;", '\\'),
    ("&#96;", '`'),
];

/// Replaces HTML-significant characters with entities.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        push_escaped(&mut out, c);
    }
    out
}

/// Like [`escape_html`] but leaves entities produced by an earlier escape intact.
///
/// Stored free text was escaped on write, so rendering it must not turn `&amp;`
/// into `&amp;amp;`.
pub fn escape_html_once(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (index, c) in raw.char_indices() {
        if c == '&' && ENTITIES.iter().any(|(entity, _)| raw[index..].starts_with(entity)) {
            out.push('&');
        } else {
            push_escaped(&mut out, c);
        }
    }
    out
}

/// Reverses [`escape_html`], turning stored text back into what was typed.
pub fn unescape_html(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#x27;"),
        '/' => out.push_str("&#x2F;"),
        '\\' => out.push_str("&#x5C;"),
        '`' => out.push_str("&#96;"),
        c => out.push(c),
    }
}

/// Trimmed and escaped free text.
pub fn clean_text(raw: &str) -> String {
    escape_html(raw.trim())
}

/// Lowercases the address; Gmail addresses also lose dots and `+tag` suffixes.
pub fn normalize_email(raw: &str) -> String {
    let raw = raw.trim();
    let Some((local, domain)) = raw.rsplit_once('@') else {
        return raw.to_lowercase();
    };
    let local = local.to_lowercase();
    let domain = domain.to_lowercase();

    if domain == "gmail.com" || domain == "googlemail.com" {
        let local = local.split('+').next().unwrap_or_default().replace('.', "");
        return format!("{local}@gmail.com");
    }
    format!("{local}@{domain}")
}

/// Parses an ISO 8601 date or date-time.
///
/// Values without an offset (what a `datetime-local` input submits) are read in
/// `local_offset`.
pub fn parse_event_time(raw: &str, local_offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_offset.from_local_datetime(&naive).single();
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    local_offset
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()
}

/// Value for a `datetime-local` input showing `time` in `local_offset`.
pub fn datetime_local_value<Tz: TimeZone>(time: &DateTime<Tz>, local_offset: FixedOffset) -> String {
    time.with_timezone(&local_offset)
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}
