//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from the crawl job (TLS, proxy, timeouts)
//! - Scope-restricted redirect following that never revisits a URL
//! - Reading bodies up to the configured size cap
//!
//! Workers only see the [`Fetcher`] trait, so tests can substitute slow or
//! scripted sources for the network.

use crate::config::{CrawlJob, HeaderList};
use crate::state::VisitedSet;
use crate::url::Scope;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Proxy};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// Per-URL fetch failures; never fatal to the crawl
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch of {url} cancelled")]
    Cancelled { url: Url },
}

/// A fetched response, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; links resolve against this
    pub final_url: Url,

    pub status: u16,

    pub content_type: Option<String>,

    /// Decoded body, possibly cut at the size cap
    pub body: String,
}

impl FetchedPage {
    /// Builds a 200 `text/html` page
    pub fn html(url: Url, body: impl Into<String>) -> Self {
        Self {
            final_url: url,
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// Statuses 200 through 202 are parsed; anything else is a per-URL error
    pub fn is_success(&self) -> bool {
        (200..203).contains(&self.status)
    }

    /// Returns true if the body should be parsed as HTML
    ///
    /// A missing Content-Type is given the benefit of the doubt.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.to_ascii_lowercase().contains("html"),
            None => true,
        }
    }
}

/// The fetch capability used by workers
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, headers: &HeaderList) -> Result<FetchedPage, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_size: Option<usize>,
}

impl HttpFetcher {
    /// Builds the client for one crawl
    ///
    /// `visited` must be the set the crawl's frontier admits through, so a
    /// redirect never lands on a URL that is dispatched separately.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Client ready for use
    /// * `Err(reqwest::Error)` - Invalid proxy or TLS setup
    pub fn new(job: &CrawlJob, visited: Arc<VisitedSet>) -> Result<Self, reqwest::Error> {
        let redirect = if job.follow_redirects {
            scoped_redirects(job.scope.clone(), visited)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .user_agent(job.user_agent.as_str())
            .timeout(job.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .redirect(redirect)
            .danger_accept_invalid_certs(job.insecure)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = &job.proxy {
            tracing::debug!("Using proxy {}", proxy);
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            max_body_size: job.max_body_size,
        })
    }
}

/// Follows up to [`MAX_REDIRECTS`] hops, only to in-scope targets not yet visited
///
/// A followed target is claimed in `visited`, so the frontier will not
/// dispatch it again. A redirect to a claimed URL stops and surfaces as a
/// 3xx response.
fn scoped_redirects(scope: Scope, visited: Arc<VisitedSet>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        if !scope.allows(attempt.url()) {
            tracing::debug!("Not following redirect out of scope to {}", attempt.url());
            return attempt.stop();
        }

        let mut target = attempt.url().clone();
        target.set_fragment(None);
        if visited.insert_new(target.as_str()) {
            attempt.follow()
        } else {
            tracing::debug!("Not following redirect to visited {}", target);
            attempt.stop()
        }
    })
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, headers: &HeaderList) -> Result<FetchedPage, FetchError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let mut response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Body {
            url: url.clone(),
            source,
        })? {
            bytes.extend_from_slice(&chunk);
            if let Some(cap) = self.max_body_size {
                if bytes.len() >= cap {
                    bytes.truncate(cap);
                    tracing::debug!("Body of {} cut at {} bytes", final_url, cap);
                    break;
                }
            }
        }

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
