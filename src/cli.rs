//! Command-line surface
//!
//! Flags follow the single-dash convention of the tool this crate replaces
//! (`-subs`, `-json`, `-timeout 5`). [`normalize_args`] rewrites those into
//! the double-dash form clap expects before parsing.

use crate::config::{parse_headers, Settings};
use crate::ConfigResult;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Multi-character flags that may be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "size", "insecure", "subs", "json", "unique", "proxy", "timeout", "dr", "config", "help",
    "quiet",
];

/// Sumi-Scout: a bounded endpoint crawler
///
/// Crawls from a seed URL to a fixed depth, staying inside the seed's host
/// (or its subdomains), and prints every link, script, and form target
/// found along the way.
#[derive(Parser, Debug, Default)]
#[command(name = "sumi-scout")]
#[command(version = "1.0.0")]
#[command(about = "A bounded endpoint crawler", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Seed URL to crawl
    #[arg(short = 'u', value_name = "URL")]
    pub url: Option<String>,

    /// Number of concurrent fetch workers [default: 8]
    #[arg(short = 't', value_name = "N")]
    pub threads: Option<usize>,

    /// Maximum link depth from the seed [default: 2]
    #[arg(short = 'd', value_name = "N")]
    pub depth: Option<u32>,

    /// Page size limit in KB, -1 for unlimited
    #[arg(long, value_name = "KB", allow_negative_numbers = true)]
    pub size: Option<i64>,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Include subdomains of the seed host in scope
    #[arg(long)]
    pub subs: bool,

    /// Print results as JSON objects
    #[arg(long)]
    pub json: bool,

    /// Prefix each result with its source kind
    #[arg(short = 's')]
    pub source: bool,

    /// Custom headers, "Name: value;;Name2: value2"
    #[arg(short = 'h', value_name = "HEADERS")]
    pub headers: Option<String>,

    /// Print each URL at most once
    #[arg(long)]
    pub unique: bool,

    /// Outbound proxy URL
    #[arg(long, env = "PROXY", value_name = "URL")]
    pub proxy: Option<String>,

    /// Seconds before the crawl is cut off, -1 for unbounded
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Disable following redirects
    #[arg(long = "dr")]
    pub disable_redirects: bool,

    /// Path to an optional TOML configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Layers the flags given on the command line over `base`
    ///
    /// Only options that were actually given override; boolean flags can
    /// switch a setting on but never off. `-h` headers are added after any
    /// headers from the config file.
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - The merged settings
    /// * `Err(ConfigError)` - The `-h` value has no colon
    pub fn into_settings(self, base: Settings) -> ConfigResult<Settings> {
        let mut settings = base;
        let crawler = &mut settings.crawler;

        if let Some(url) = self.url {
            crawler.url = Some(url);
        }
        if let Some(threads) = self.threads {
            crawler.threads = threads;
        }
        if let Some(depth) = self.depth {
            crawler.depth = depth;
        }
        if let Some(size) = self.size {
            crawler.size = size;
        }
        if let Some(timeout) = self.timeout {
            crawler.timeout = timeout;
        }
        if let Some(proxy) = self.proxy {
            crawler.proxy = Some(proxy);
        }
        crawler.insecure |= self.insecure;
        crawler.subs |= self.subs;
        crawler.disable_redirects |= self.disable_redirects;

        let output = &mut settings.output;
        output.json |= self.json;
        output.source |= self.source;
        output.unique |= self.unique;

        if let Some(raw) = self.headers.as_deref() {
            settings.headers.extend(parse_headers(raw)?);
        }

        Ok(settings)
    }
}

/// Rewrites single-dash long flags (`-subs`, `-size=5`) to double-dash
///
/// Short flags and values are left alone, as is everything after `--`.
///
/// # Example
///
/// ```
/// use sumi_scout::cli::normalize_args;
///
/// let args = normalize_args(["sumi-scout", "-u", "http://h/", "-subs", "-timeout=5"]);
/// assert_eq!(args, vec!["sumi-scout", "-u", "http://h/", "--subs", "--timeout=5"]);
/// ```
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut rest_verbatim = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if rest_verbatim {
                return arg;
            }

            let Some(text) = arg.to_str() else {
                return arg;
            };

            if text == "--" {
                rest_verbatim = true;
                return arg;
            }

            match text.strip_prefix('-') {
                Some(flag) if !flag.starts_with('-') => {
                    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
