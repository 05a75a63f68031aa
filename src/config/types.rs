use crate::output::OutputMode;
use crate::url::Scope;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// User agent sent when no `User-Agent` header or setting overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";

/// Main settings structure for Sumi-Scout
///
/// Built from defaults, then an optional TOML file, then command-line flags.
/// [`CrawlJob::from_settings`] turns it into the immutable job.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub crawler: CrawlerSettings,
    pub output: OutputSettings,
    /// Extra request headers; `-h` entries are layered on top
    pub headers: HeaderList,
}

/// Crawler behavior settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerSettings {
    /// Seed URL
    pub url: Option<String>,

    /// Number of parallel fetch workers
    pub threads: usize,

    /// Maximum link-hops from the seed
    pub depth: u32,

    /// Page size limit in KB, -1 for unlimited
    pub size: i64,

    /// Whole-crawl cutoff in seconds, -1 for unbounded
    pub timeout: i64,

    /// Include subdomains of the seed host in scope
    pub subs: bool,

    /// Disable TLS certificate verification
    pub insecure: bool,

    /// Do not follow HTTP redirects
    pub disable_redirects: bool,

    /// Outbound proxy URL
    pub proxy: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout: u64,

    /// User agent for every request
    pub user_agent: String,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            url: None,
            threads: 8,
            depth: 2,
            size: -1,
            timeout: -1,
            subs: false,
            insecure: false,
            disable_redirects: false,
            proxy: None,
            request_timeout: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Emit JSON objects instead of plain lines
    pub json: bool,

    /// Prefix each line with its source kind
    pub source: bool,

    /// Suppress repeated URLs
    pub unique: bool,
}

impl OutputSettings {
    /// Resolves the single active output mode; JSON wins over annotation
    pub fn mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.source {
            OutputMode::Annotated
        } else {
            OutputMode::Plain
        }
    }
}

/// Ordered mapping from header name to value
///
/// Names compare case-insensitively. Inserting an existing name replaces its
/// value in place, so first-seen order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a header
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a header value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Appends every entry of `other`, replacing duplicates
    pub fn extend(&mut self, other: HeaderList) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for HeaderList {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut headers = HeaderList::new();
        for (name, value) in map {
            headers.insert(name, value);
        }
        headers
    }
}

/// A single crawl, fully resolved and read-only for its whole lifetime
#[derive(Debug, Clone)]
pub struct CrawlJob {
    /// Where traversal starts (depth 0)
    pub seed: Url,

    /// Items deeper than this are never dispatched
    pub max_depth: u32,

    /// Number of fetch workers, at least 1
    pub parallelism: usize,

    /// Body bytes parsed per page, `None` for unlimited
    pub max_body_size: Option<usize>,

    /// Whole-crawl cutoff, `None` for unbounded
    pub timeout: Option<Duration>,

    /// Which hosts may be traversed
    pub scope: Scope,

    pub follow_redirects: bool,

    /// Sent with every request
    pub headers: HeaderList,

    pub insecure: bool,

    pub proxy: Option<Url>,

    pub request_timeout: Duration,

    pub user_agent: String,

    pub output: OutputMode,

    /// Emit each URL at most once
    pub unique: bool,
}

impl CrawlJob {
    /// Builds a job from merged settings
    ///
    /// Validates the settings and resolves the seed's scope, so a malformed
    /// seed fails here, before any crawling starts.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - Ready to hand to a supervisor
    /// * `Err(ScoutError)` - Invalid settings or an unresolvable seed URL
    pub fn from_settings(settings: &Settings) -> crate::Result<Self> {
        super::validation::validate(settings)?;

        let crawler = &settings.crawler;
        let seed = crawler.url.as_deref().ok_or_else(|| {
            crate::ConfigError::Validation("a seed URL is required (-u)".to_string())
        })?;

        let headers = settings.headers.clone();
        let (seed, scope) = Scope::resolve(seed, crawler.subs, headers.get("Host"))?;

        let proxy = match crawler.proxy.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => Some(
                Url::parse(p).map_err(|e| crate::ConfigError::InvalidUrl(format!("{p}: {e}")))?,
            ),
            None => None,
        };

        let max_body_size = if crawler.size > 0 {
            let bytes = usize::try_from(crawler.size)
                .ok()
                .and_then(|kb| kb.checked_mul(1024))
                .ok_or_else(|| {
                    crate::ConfigError::Validation(format!(
                        "size {} KB does not fit in memory",
                        crawler.size
                    ))
                })?;
            Some(bytes)
        } else {
            None
        };
        let timeout = (crawler.timeout > 0).then(|| Duration::from_secs(crawler.timeout as u64));

        Ok(Self {
            seed,
            max_depth: crawler.depth,
            parallelism: crawler.threads,
            max_body_size,
            timeout,
            scope,
            follow_redirects: !crawler.disable_redirects,
            headers,
            insecure: crawler.insecure,
            proxy,
            request_timeout: Duration::from_secs(crawler.request_timeout),
            user_agent: crawler.user_agent.clone(),
            output: settings.output.mode(),
            unique: settings.output.unique,
        })
    }
}
