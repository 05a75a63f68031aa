//! Configuration module for Sumi-Scout
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. The merged [`Settings`] are validated and resolved
//! into an immutable [`CrawlJob`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_scout::config::{load_config, CrawlJob};
//! use std::path::Path;
//!
//! let mut settings = load_config(Path::new("scout.toml")).unwrap();
//! settings.crawler.url = Some("https://example.com/".to_string());
//! let job = CrawlJob::from_settings(&settings).unwrap();
//! println!("Crawler will use max depth: {}", job.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlJob, CrawlerSettings, HeaderList, OutputSettings, Settings, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_headers};
pub use validation::validate;
