//! Crawl scope derived from the seed URL
//!
//! Exactly one scoping mode is active per crawl and the scope never changes
//! once a crawl has started.

use super::domain::{extract_hostname, parse_seed};
use super::matcher::{host_within, strip_port};
use crate::UrlResult;
use std::collections::BTreeSet;
use url::Url;

/// Host scope for traversal decisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Only these exact hostnames are in scope
    Hosts(BTreeSet<String>),

    /// The root domain and every subdomain below it are in scope
    Subdomains(String),
}

impl Scope {
    /// Resolves the scope for a crawl from its seed URL
    ///
    /// With `include_subdomains` unset the scope is the seed's hostname plus
    /// the `Host` header override, if one is configured. With it set, the
    /// scope is the seed's hostname and all of its subdomains and the
    /// override is not consulted.
    ///
    /// # Returns
    ///
    /// * `Ok((Url, Scope))` - The parsed seed and its scope
    /// * `Err(UrlError)` - The seed cannot be parsed or has no hostname
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scout::url::Scope;
    /// use url::Url;
    ///
    /// let (_, scope) = Scope::resolve("https://example.com/", true, None).unwrap();
    /// assert!(scope.allows(&Url::parse("https://api.example.com/x").unwrap()));
    /// assert!(!scope.allows(&Url::parse("https://evil-example.com/").unwrap()));
    /// ```
    pub fn resolve(
        seed: &str,
        include_subdomains: bool,
        host_override: Option<&str>,
    ) -> UrlResult<(Url, Scope)> {
        let seed = parse_seed(seed)?;
        let hostname = extract_hostname(&seed)?;

        let scope = if include_subdomains {
            Scope::Subdomains(hostname)
        } else {
            let mut hosts = BTreeSet::from([hostname]);
            if let Some(host) = host_override.map(strip_port).filter(|h| !h.is_empty()) {
                hosts.insert(host);
            }
            Scope::Hosts(hosts)
        };

        tracing::debug!("Resolved crawl scope: {}", scope);
        Ok((seed, scope))
    }

    /// Returns true if the URL may be traversed
    ///
    /// Only http(s) URLs with a hostname can be in scope.
    pub fn allows(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match extract_hostname(url) {
            Ok(host) => self.allows_host(&host),
            Err(_) => false,
        }
    }

    /// Returns true if a bare (lowercase) hostname is in scope
    pub fn allows_host(&self, host: &str) -> bool {
        match self {
            Scope::Hosts(hosts) => hosts.contains(host),
            Scope::Subdomains(root) => host_within(root, host),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Hosts(hosts) => {
                let hosts: Vec<&str> = hosts.iter().map(String::as_str).collect();
                write!(f, "hosts [{}]", hosts.join(", "))
            }
            Scope::Subdomains(root) => write!(f, "{root} and *.{root}"),
        }
    }
}
