use super::endpoint::Endpoint;

/// Line format for emitted endpoints; exactly one is active per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The bare URL
    #[default]
    Plain,

    /// `[source] URL`
    Annotated,

    /// `{"Source":"...","URL":"..."}`
    Json,
}

/// Formats an endpoint as a single output line, without the newline
///
/// # Examples
///
/// ```
/// use sumi_scout::output::{format_endpoint, Endpoint, OutputMode, Source};
///
/// let endpoint = Endpoint::new(Source::Script, "http://h/b.js");
/// assert_eq!(format_endpoint(&endpoint, OutputMode::Plain).unwrap(), "http://h/b.js");
/// assert_eq!(
///     format_endpoint(&endpoint, OutputMode::Annotated).unwrap(),
///     "[script] http://h/b.js"
/// );
/// ```
pub fn format_endpoint(endpoint: &Endpoint, mode: OutputMode) -> Result<String, serde_json::Error> {
    match mode {
        OutputMode::Plain => Ok(endpoint.url.clone()),
        OutputMode::Annotated => Ok(format!("[{}] {}", endpoint.source, endpoint.url)),
        OutputMode::Json => serde_json::to_string(endpoint),
    }
}
