//! Integration tests for configuration layering
//!
//! Defaults, then a TOML file, then command-line flags, resolved into a job.

use clap::Parser;
use std::io::Write;
use std::time::Duration;
use sumi_scout::cli::{normalize_args, Cli};
use sumi_scout::config::load_config;
use sumi_scout::{CrawlJob, OutputMode, Scope, ScoutError};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["sumi-scout"];
    full.extend_from_slice(args);
    Cli::try_parse_from(normalize_args(full)).unwrap()
}

#[test]
fn test_file_then_flags() {
    let file = write_config(
        r#"
[crawler]
url = "https://example.com/"
threads = 3
depth = 4
timeout = 30
request-timeout = 5

[output]
unique = true

[headers]
Cookie = "session=file"
"#,
    );

    let base = load_config(file.path()).unwrap();
    let settings = cli(&["-d", "1", "-subs", "-json", "-h", "Cookie: session=cli"])
        .into_settings(base)
        .unwrap();
    let job = CrawlJob::from_settings(&settings).unwrap();

    assert_eq!(job.seed.as_str(), "https://example.com/");
    assert_eq!(job.parallelism, 3);
    assert_eq!(job.max_depth, 1);
    assert_eq!(job.timeout, Some(Duration::from_secs(30)));
    assert_eq!(job.request_timeout, Duration::from_secs(5));
    assert_eq!(job.scope, Scope::Subdomains("example.com".to_string()));
    assert_eq!(job.output, OutputMode::Json);
    assert!(job.unique);
    assert_eq!(job.headers.get("cookie"), Some("session=cli"));
}

#[test]
fn test_flag_defaults() {
    let settings = cli(&["-u", "http://h.test/"])
        .into_settings(Default::default())
        .unwrap();
    let job = CrawlJob::from_settings(&settings).unwrap();

    assert_eq!(job.parallelism, 8);
    assert_eq!(job.max_depth, 2);
    assert_eq!(job.max_body_size, None);
    assert_eq!(job.timeout, None);
    assert!(job.follow_redirects);
    assert!(!job.insecure);
    assert_eq!(job.output, OutputMode::Plain);
}

#[test]
fn test_size_is_kilobytes() {
    let settings = cli(&["-u", "http://h.test/", "-size", "64", "-dr"])
        .into_settings(Default::default())
        .unwrap();
    let job = CrawlJob::from_settings(&settings).unwrap();

    assert_eq!(job.max_body_size, Some(64 * 1024));
    assert!(!job.follow_redirects);
}

#[test]
fn test_unresolvable_seed_is_fatal() {
    let settings = cli(&["-u", "not a url"])
        .into_settings(Default::default())
        .unwrap();
    let err = CrawlJob::from_settings(&settings).unwrap_err();
    assert!(matches!(err, ScoutError::Url(_)));
}

#[test]
fn test_unknown_file_key_is_rejected() {
    let file = write_config("[crawler]\nthreadz = 3\n");
    assert!(load_config(file.path()).is_err());
}
