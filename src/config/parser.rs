use crate::config::types::{HeaderList, Settings};
use crate::ConfigError;
use std::path::Path;

/// Loads settings from a TOML file
///
/// Missing keys fall back to their defaults; unknown keys are rejected.
/// Validation is deferred until command-line overrides have been applied.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scout::config::load_config;
///
/// let settings = load_config(Path::new("scout.toml")).unwrap();
/// println!("Threads: {}", settings.crawler.threads);
/// ```
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

/// Parses the `-h` header flag
///
/// Entries are separated by `;;`. Each entry is split on the first `": "`,
/// or failing that the first `":"`, and both halves are trimmed. Entries
/// without a colon are skipped.
///
/// # Returns
///
/// * `Ok(HeaderList)` - Parsed headers (empty for empty input)
/// * `Err(ConfigError::InvalidHeader)` - The input has no colon at all
///
/// # Example
///
/// ```
/// use sumi_scout::config::parse_headers;
///
/// let headers = parse_headers("Cookie: foo=bar;;Referer: http://example.com/").unwrap();
/// assert_eq!(headers.get("Cookie"), Some("foo=bar"));
/// assert_eq!(headers.get("Referer"), Some("http://example.com/"));
/// ```
pub fn parse_headers(raw: &str) -> Result<HeaderList, ConfigError> {
    let mut headers = HeaderList::new();

    if raw.is_empty() {
        return Ok(headers);
    }

    if !raw.contains(':') {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    }

    for entry in raw.split(";;") {
        let parts = entry.split_once(": ").or_else(|| entry.split_once(':'));
        let Some((name, value)) = parts else {
            tracing::debug!("Skipping header entry without a colon: {:?}", entry);
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        headers.insert(name, value.trim());
    }

    Ok(headers)
}
