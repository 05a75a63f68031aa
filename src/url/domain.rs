use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a seed URL and checks it can anchor a crawl
///
/// The seed must be an absolute http(s) URL with a hostname.
///
/// # Examples
///
/// ```
/// use sumi_scout::url::parse_seed;
///
/// let seed = parse_seed("https://Example.com/start").unwrap();
/// assert_eq!(seed.host_str(), Some("example.com"));
///
/// assert!(parse_seed("example.com").is_err());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{url_str}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    // Validates the host as a side effect
    extract_hostname(&url)?;

    Ok(url)
}

/// Extracts the lowercase hostname from a URL
///
/// Ports are not part of the hostname; an empty or missing host is an error.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scout::url::extract_hostname;
///
/// let url = Url::parse("https://sub.example.com:8443/path").unwrap();
/// assert_eq!(extract_hostname(&url).unwrap(), "sub.example.com");
/// ```
pub fn extract_hostname(url: &Url) -> UrlResult<String> {
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_lowercase()),
        _ => Err(UrlError::MissingHost(url.to_string())),
    }
}
