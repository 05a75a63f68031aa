//! HTML parser for extracting endpoints
//!
//! This module handles parsing HTML content to extract:
//! - Anchor targets (`<a href>`), which are also traversed
//! - Script sources (`<script src>`)
//! - Form actions (`<form action>`)
//! - The document's `<base href>`, if any

use crate::output::Source;
use scraper::{Html, Selector};
use url::Url;

/// Raw attribute values found in a document, in document order per source
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The first `<base href>` value
    pub base_href: Option<String>,

    /// `(source, attribute value)` pairs, unresolved
    pub elements: Vec<(Source, String)>,
}

/// An endpoint resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: Source,
    pub url: Url,
}

const ELEMENT_SELECTORS: [(Source, &str, &str); 3] = [
    (Source::Href, "a[href]", "href"),
    (Source::Script, "script[src]", "src"),
    (Source::Form, "form[action]", "action"),
];

/// Parses HTML and collects the raw attribute values of interest
///
/// # Example
///
/// ```
/// use sumi_scout::crawler::parse_html;
/// use sumi_scout::output::Source;
///
/// let html = r#"<html><body><a href="/page">Link</a><script src="app.js"></script></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.elements[0], (Source::Href, "/page".to_string()));
/// assert_eq!(parsed.elements[1], (Source::Script, "app.js".to_string()));
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let base_href = Selector::parse("base[href]").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .map(str::to_string)
    });

    let mut elements = Vec::new();
    for (source, css, attr) in ELEMENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                elements.push((source, value.to_string()));
            }
        }
    }

    ParsedPage {
        base_href,
        elements,
    }
}

/// Resolves an attribute value to an absolute URL and validates it
///
/// Returns None if the value should be discarded:
/// - empty or fragment-only values
/// - javascript:, mailto:, tel:, data: values
/// - values that do not resolve
/// - non-HTTP(S) URLs after resolution
///
/// The fragment is stripped from the result.
pub fn resolve_link(value: &str, base: &Url) -> Option<Url> {
    let value = value.trim();

    if value.is_empty() || value.starts_with('#') {
        return None;
    }

    let lower = value.get(..11).unwrap_or(value).to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base.join(value).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

/// Extracts every resolvable endpoint from a page
///
/// Relative values resolve against `<base href>` when the page declares
/// one, else against `page_url`, which should be the post-redirect URL.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Link> {
    let parsed = parse_html(html);

    let base = parsed
        .base_href
        .as_deref()
        .and_then(|href| page_url.join(href.trim()).ok())
        .filter(|base| base.scheme() == "http" || base.scheme() == "https")
        .unwrap_or_else(|| page_url.clone());

    parsed
        .elements
        .into_iter()
        .filter_map(|(source, value)| {
            resolve_link(&value, &base).map(|url| Link { source, url })
        })
        .collect()
}
