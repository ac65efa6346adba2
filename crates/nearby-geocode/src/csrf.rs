//! Anti-forgery token resolution for state-changing requests.

use regex::Regex;

/// Header that carries the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Resolve the token to attach to an outgoing lookup.
///
/// Order: the page meta tag's content, then a `viewer_csrftoken` or
/// `csrftoken` cookie (whichever appears first in the header). Returns an
/// empty string when neither yields a value; the server rejects such calls.
#[must_use]
pub fn resolve_csrf_token(meta: Option<&str>, cookies: Option<&str>) -> String {
    if let Some(token) = meta.map(str::trim).filter(|t| !t.is_empty()) {
        return token.to_string();
    }
    cookies.and_then(token_from_cookies).unwrap_or_default()
}

fn token_from_cookies(cookies: &str) -> Option<String> {
    let re = Regex::new(r"(?:^|;)\s*(?:viewer_csrftoken|csrftoken)\s*=\s*([^;]+)")
        .expect("valid csrf cookie regex");
    re.captures(cookies)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| !token.is_empty())
}
