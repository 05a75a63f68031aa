use serde::Serialize;
use std::fmt;

/// Where on a page an endpoint was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// `<a href="...">`
    Href,

    /// `<script src="...">`
    Script,

    /// `<form action="...">`
    Form,
}

impl Source {
    /// Returns true if endpoints of this kind are traversed as pages
    ///
    /// Script and form targets are reported but never fetched.
    pub fn is_followable(&self) -> bool {
        matches!(self, Self::Href)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Script => "script",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered endpoint and its provenance
///
/// Serializes as `{"Source":"href","URL":"https://example.com/a"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    #[serde(rename = "Source")]
    pub source: Source,

    /// Absolute URL
    #[serde(rename = "URL")]
    pub url: String,
}

impl Endpoint {
    pub fn new(source: Source, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
        }
    }
}
