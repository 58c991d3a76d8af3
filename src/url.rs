//! Redirect URL normalization
//!
//! Both the hosting config and the generated redirect pages embed the same
//! base URL, so they must go through [`normalize_redirect_url`].

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Normalize a user-supplied redirect destination into an absolute base URL.
///
/// - Without an `http://` or `https://` prefix (case-insensitive), `https://`
///   is prepended. An existing scheme is kept exactly as typed.
/// - All trailing `/` characters are stripped.
///
/// ```
/// use redirect_deployer::url::normalize_redirect_url;
///
/// assert_eq!(normalize_redirect_url("example.com"), "https://example.com");
/// assert_eq!(normalize_redirect_url("HTTP://example.com/"), "HTTP://example.com");
/// ```
pub fn normalize_redirect_url(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let with_scheme = if SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    with_scheme.trim_end_matches('/').to_string()
}
