//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! crawl cycle end-to-end, plus scripted `Fetcher` implementations for link
//! graphs and sources that never answer.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sumi_scout::config::{HeaderList, Settings};
use sumi_scout::crawler::{FetchError, FetchedPage, Fetcher};
use sumi_scout::{crawl, CrawlJob, CrawlOutcome, Supervisor};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn job_with(url: &str, configure: impl FnOnce(&mut Settings)) -> CrawlJob {
    let mut settings = Settings::default();
    settings.crawler.url = Some(url.to_string());
    configure(&mut settings);
    CrawlJob::from_settings(&settings).expect("valid test job")
}

/// A 200 response served as `text/html`
fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn redirect(status: u16, location: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("location", location)
}

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .expect("utf-8 output")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Serves a fixed map of pages and records every fetch
#[derive(Default)]
struct GraphFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
    stall_unknown: bool,
}

impl GraphFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn stalling(mut self) -> Self {
        self.stall_unknown = true;
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &Url, _: &HeaderList) -> Result<FetchedPage, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        // Let other workers interleave
        tokio::task::yield_now().await;

        match self.pages.get(url.as_str()) {
            Some(body) => Ok(FetchedPage::html(url.clone(), body.clone())),
            None if self.stall_unknown => std::future::pending().await,
            None => Ok(FetchedPage::html(url.clone(), "")),
        }
    }
}

async fn run_graph(job: CrawlJob, fetcher: Arc<GraphFetcher>) -> (CrawlOutcome, Vec<String>) {
    let mut supervisor = Supervisor::new(job, fetcher);
    let (report, out) = supervisor.run(Vec::new()).await.expect("crawl succeeds");
    (report.outcome, lines(out))
}

#[tokio::test]
async fn test_fixture_yields_three_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
            <a href="/a">A</a>
            <script src="/b.js"></script>
            <form action="/c"></form>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("<html><body>leaf</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let job = job_with(&base, |s| {
        s.crawler.depth = 1;
        s.crawler.threads = 1;
        s.output.json = true;
    });

    let (report, out) = crawl(job, Vec::new()).await.expect("crawl succeeds");
    assert_eq!(report.outcome, CrawlOutcome::Completed);

    let mut results: Vec<(String, String)> = lines(out)
        .iter()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("JSON line");
            (
                value["Source"].as_str().unwrap_or_default().to_string(),
                value["URL"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    results.sort();

    assert_eq!(
        results,
        vec![
            ("form".to_string(), format!("{}/c", base)),
            ("href".to_string(), format!("{}/a", base)),
            ("script".to_string(), format!("{}/b.js", base)),
        ]
    );
    assert_eq!(report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_unusable_links_produce_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r##"<a href="javascript:void(0)">js</a><a href="">empty</a><a href="#top">top</a>"##,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let job = job_with(&server.uri(), |_| {});
    let (report, out) = crawl(job, Vec::new()).await.expect("crawl succeeds");

    assert!(out.is_empty());
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.links_enqueued, 0);
}

#[tokio::test]
async fn test_failed_pages_do_not_abort_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/missing">m</a><a href="/ok">o</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(r#"<script src="/found.js"></script>"#))
        .mount(&server)
        .await;

    let base = server.uri();
    let job = job_with(&base, |s| s.output.source = true);
    let (report, out) = crawl(job, Vec::new()).await.expect("crawl succeeds");

    let out = lines(out);
    assert!(out.contains(&format!("[script] {}/found.js", base)));
    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetch_errors, 1);
}

#[tokio::test]
async fn test_redirect_to_linked_page_fetches_it_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">a</a><a href="/b">b</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect(302, "/b"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("<p>b</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let job = job_with(&server.uri(), |s| s.crawler.threads = 4);
    let (report, _) = crawl(job, Vec::new()).await.expect("crawl succeeds");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    // /b is already claimed, so the hop from /a stops at its 302
    assert_eq!(report.stats.fetch_errors, 1);
    assert_eq!(report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_followed_redirect_target_is_not_dispatched_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">a</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect(302, "/b"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/b">self</a><a href="/a">back</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let job = job_with(&base, |s| s.crawler.depth = 3);
    let (report, out) = crawl(job, Vec::new()).await.expect("crawl succeeds");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.stats.links_enqueued, 1);
    assert_eq!(report.stats.fetch_errors, 0);

    // Links on /b resolve against the final URL
    let out = lines(out);
    assert!(out.contains(&format!("{}/b", base)));
    assert!(out.contains(&format!("{}/a", base)));
}

#[tokio::test]
async fn test_disabled_redirects_fail_only_that_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/moved">m</a><a href="/ok">o</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(redirect(301, "/ok"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(r#"<script src="/app.js"></script>"#))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let job = job_with(&base, |s| {
        s.crawler.disable_redirects = true;
        s.output.source = true;
    });
    let (report, out) = crawl(job, Vec::new()).await.expect("crawl succeeds");

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.stats.fetch_errors, 1);
    assert_eq!(report.stats.pages_fetched, 2);

    let out = lines(out);
    assert!(out.contains(&format!("[script] {}/app.js", base)));
    assert!(out.contains(&format!("[href] {}/moved", base)));
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    // Every page links to every other page
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
        .collect();
    let urls: Vec<String> = std::iter::once("http://h.test/".to_string())
        .chain((0..10).map(|i| format!("http://h.test/p{}", i)))
        .collect();
    let pages: Vec<(&str, &str)> = urls.iter().map(|u| (u.as_str(), links.as_str())).collect();

    let fetcher = Arc::new(GraphFetcher::new(&pages));
    let job = job_with("http://h.test/", |s| {
        s.crawler.threads = 8;
        s.crawler.depth = 5;
    });

    let (outcome, out) = run_graph(job, fetcher.clone()).await;
    assert_eq!(outcome, CrawlOutcome::Completed);

    let fetched = fetcher.fetched();
    let distinct: HashSet<&String> = fetched.iter().collect();
    assert_eq!(fetched.len(), distinct.len(), "duplicate fetch in {:?}", fetched);
    assert_eq!(fetched.len(), 11);

    // Without -unique every discovery is printed
    assert_eq!(out.len(), 11 * 10);
}

#[tokio::test]
async fn test_unique_prints_each_url_once() {
    let links = r#"<a href="/x">x</a><a href="/y">y</a><script src="/x"></script>"#;
    let fetcher = Arc::new(GraphFetcher::new(&[
        ("http://h.test/", links),
        ("http://h.test/x", links),
        ("http://h.test/y", links),
    ]));
    let job = job_with("http://h.test/", |s| {
        s.crawler.threads = 4;
        s.output.unique = true;
    });

    let (_, out) = run_graph(job, fetcher).await;

    let distinct: HashSet<&String> = out.iter().collect();
    assert_eq!(out.len(), distinct.len());
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn test_depth_limit() {
    let fetcher = Arc::new(GraphFetcher::new(&[
        ("http://h.test/", r#"<a href="/1">1</a>"#),
        ("http://h.test/1", r#"<a href="/2">2</a>"#),
        ("http://h.test/2", r#"<a href="/3">3</a>"#),
        ("http://h.test/3", r#"<a href="/4">4</a>"#),
    ]));
    let job = job_with("http://h.test/", |s| s.crawler.depth = 2);

    let (_, out) = run_graph(job, fetcher.clone()).await;

    assert_eq!(
        fetcher.fetched(),
        vec!["http://h.test/", "http://h.test/1", "http://h.test/2"]
    );
    // The depth-2 page still reports its link
    assert!(out.contains(&"http://h.test/3".to_string()));
}

#[tokio::test]
async fn test_subdomain_scope_respects_host_boundaries() {
    let fetcher = Arc::new(GraphFetcher::new(&[(
        "http://hostname.test/",
        r#"
        <a href="http://api.hostname.test/">sub</a>
        <a href="http://nothostname.test/">suffix</a>
        <a href="http://evil-hostname.test/">hyphen</a>
        <a href="http://hostname.test.evil/">trailing</a>
        "#,
    )]));
    let job = job_with("http://hostname.test/", |s| s.crawler.subs = true);

    let (_, out) = run_graph(job, fetcher.clone()).await;

    let fetched: HashSet<String> = fetcher.fetched().into_iter().collect();
    assert_eq!(
        fetched,
        HashSet::from([
            "http://hostname.test/".to_string(),
            "http://api.hostname.test/".to_string(),
        ])
    );
    // Out-of-scope endpoints are still reported
    assert_eq!(out.len(), 4);
}

#[tokio::test]
async fn test_exact_scope_with_host_override() {
    let fetcher = Arc::new(GraphFetcher::new(&[(
        "http://hostname.test/",
        r#"
        <a href="http://api.hostname.test/">sub</a>
        <a href="http://proxied.test/">override</a>
        "#,
    )]));
    let job = job_with("http://hostname.test/", |s| {
        s.headers.insert("Host", "proxied.test");
    });

    run_graph(job, fetcher.clone()).await;

    let fetched: HashSet<String> = fetcher.fetched().into_iter().collect();
    assert_eq!(
        fetched,
        HashSet::from([
            "http://hostname.test/".to_string(),
            "http://proxied.test/".to_string(),
        ])
    );
}

#[tokio::test]
async fn test_timeout_cuts_off_stalled_crawl() {
    // The seed answers; everything it links to never does
    let fetcher = Arc::new(
        GraphFetcher::new(&[(
            "http://h.test/",
            r#"<a href="/slow1">1</a><a href="/slow2">2</a><script src="/s.js"></script>"#,
        )])
        .stalling(),
    );
    let job = job_with("http://h.test/", |s| {
        s.crawler.timeout = 1;
        s.crawler.threads = 2;
        s.output.json = true;
    });

    let started = Instant::now();
    let mut supervisor = Supervisor::new(job, fetcher.clone());
    let (report, out) = tokio::time::timeout(Duration::from_secs(5), supervisor.run(Vec::new()))
        .await
        .expect("crawl must end within the grace period")
        .expect("timeout is not an error");

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(report.outcome, CrawlOutcome::TimedOut);

    // Every line written before the cutoff is whole
    let out = lines(out);
    assert_eq!(out.len(), 3);
    for line in &out {
        serde_json::from_str::<serde_json::Value>(line).expect("complete JSON line");
    }
    assert!(fetcher.fetched().len() >= 2);
}
