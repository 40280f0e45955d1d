//! The `token` session cookie.

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Extracts the session token from a raw `Cookie` request header.
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value storing the token for thirty days.
///
/// Returns `None` for tokens that cannot be stored verbatim in a cookie.
pub fn set_token_cookie(token: &str, secure: bool) -> Option<String> {
    if token.is_empty() || !token.chars().all(is_cookie_octet) {
        return None;
    }
    Some(format!(
        "{TOKEN_COOKIE}={token}; Max-Age={TOKEN_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax{}",
        if secure { "; Secure" } else { "" }
    ))
}

/// `Set-Cookie` value expiring the token immediately.
pub fn clear_token_cookie(secure: bool) -> String {
    format!(
        "{TOKEN_COOKIE}=; Max-Age=-1; Path=/; HttpOnly; SameSite=Lax{}",
        if secure { "; Secure" } else { "" }
    )
}

// RFC 6265 cookie-octet
fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}
