//! Origin and path extraction from parsed URLs.

use url::Url;

/// Sanitizes an environment URL down to its origin (scheme, host, port).
///
/// Any path, query, or fragment is discarded and there is no trailing slash.
/// Returns `None` if the value does not parse or has an opaque origin
/// (e.g. `data:` or `file:` URLs), since those cannot prefix a page path.
pub fn sanitize_env_url(env: &str) -> Option<String> {
    let parsed = Url::parse(env.trim()).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

/// Returns the page part of a parsed URL: path, then `?query` and `#fragment`
/// when present. Scheme and host are dropped.
pub fn path_of(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
