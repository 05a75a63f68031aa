/// Checks if a host equals a root domain or sits below it
///
/// Matching respects label boundaries: `blog.example.com` is within
/// `example.com`, but `notexample.com` and `evil-example.com` are not.
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use sumi_scout::url::host_within;
///
/// assert!(host_within("example.com", "example.com"));
/// assert!(host_within("example.com", "api.v2.example.com"));
/// assert!(!host_within("example.com", "notexample.com"));
/// assert!(!host_within("example.com", "example.com.evil.org"));
/// ```
pub fn host_within(root: &str, candidate: &str) -> bool {
    if root.is_empty() || candidate.is_empty() {
        return false;
    }

    match candidate.strip_suffix(root) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.') && prefix.len() > 1,
        None => false,
    }
}

/// Strips a trailing `:port` from a `Host` header value and lowercases it
///
/// Bracketed IPv6 literals keep their brackets so they compare equal to
/// `Url::host_str`.
pub fn strip_port(host: &str) -> String {
    let host = host.trim();

    let bare = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        }
    };

    bare.to_lowercase()
}
