use percent_encoding::percent_decode_str;

/// Header mutating requests must carry.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Looks up `name` in a `document.cookie` style string (`a=1; b=2`) and
/// returns its percent-decoded value.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
