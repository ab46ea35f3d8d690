//! End-to-end scrape tests against recorded pages.
//!
//! The HTTP layer is replaced with an in-memory fetcher so these run offline.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use fd2ppv::config::Config;
use fd2ppv::scrapers::fd2ppv::SITE_NAME;
use fd2ppv::scrapers::{CookieMap, FetchError, FetchText, LogCategory, MemorySink};
use fd2ppv::{Fd2ppvScraper, ScrapeError};

const ARTICLE: &str = include_str!("fixtures/article.html");
const HOME_LOGGED_IN: &str = include_str!("fixtures/home_logged_in.html");
const HOME_GUEST: &str = include_str!("fixtures/home_guest.html");

const COOKIE: &str = "remember_web=abc123; XSRF-TOKEN=tok; broken";

/// Serves fixed bodies by URL and records every request.
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeFetcher {
    fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchText for FakeFetcher {
    async fn fetch_text(&self, url: &str, cookies: &CookieMap) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), cookies.header_value()));
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

fn config(cookie: Option<&str>) -> Config {
    Config {
        cookie: cookie.map(str::to_string),
        ..Default::default()
    }
}

fn make_scraper(fetcher: Arc<FakeFetcher>, config: Config) -> (Fd2ppvScraper, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let scraper = Fd2ppvScraper::new(fetcher, Arc::new(config)).with_log_sink(sink.clone());
    (scraper, sink)
}

fn record(result: &fd2ppv::LocalizedResult) -> Value {
    serde_json::to_value(result).unwrap()[SITE_NAME]["zh_cn"].clone()
}

fn assert_empty_everywhere(result: &fd2ppv::LocalizedResult) {
    let json = serde_json::to_value(result).unwrap();
    let empty = serde_json::json!({"title": "", "thumb": "", "website": ""});
    for locale in ["zh_cn", "zh_tw", "jp"] {
        assert_eq!(json[SITE_NAME][locale], empty, "locale {}", locale);
    }
}

#[tokio::test]
async fn test_full_article() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/4347402", ARTICLE),
    );
    let (scraper, sink) = make_scraper(fetcher.clone(), config(Some(COOKIE)));

    let result = scraper.extract("fc2-ppv-4347402", None).await;
    let record = record(&result);

    assert_eq!(record["number"], "FC2-4347402");
    assert_eq!(record["title"], "Weekend getaway by the lake");
    assert_eq!(record["originaltitle"], record["title"]);
    assert_eq!(record["outline"], record["title"]);
    assert_eq!(record["originalplot"], record["title"]);
    assert_eq!(record["release"], "2024-03-15");
    assert_eq!(record["year"], "2024");
    assert_eq!(record["runtime"], "01:12:45");
    assert_eq!(record["actor"], "Hana,Mio");
    assert_eq!(record["studio"], "Lakeside Films");
    assert_eq!(record["publisher"], "Lakeside Films");
    assert_eq!(record["mosaic"], "无码");
    assert_eq!(record["thumb"], "https://img.fd2ppv.cc/covers/4347402.jpg");
    assert_eq!(record["poster"], record["thumb"]);
    assert_eq!(record["website"], "https://fd2ppv.cc/articles/4347402");
    assert_eq!(record["source"], "fc2");
    assert_eq!(record["series"], "FC2系列");
    assert_eq!(record["image_download"], false);
    assert_eq!(record["image_cut"], "center");
    assert_eq!(record["extrafanart"], serde_json::json!([]));
    assert_eq!(
        record["actor_photo"],
        serde_json::json!({
            "Hana": "https://fd2ppv.cc/storage/avatars/hana.jpg",
            "Mio": "https://cdn.fd2ppv.cc/avatars/mio.jpg",
        })
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json[SITE_NAME]["zh_tw"], record);
    assert_eq!(json[SITE_NAME]["jp"], record);

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].1.as_deref(),
        Some("XSRF-TOKEN=tok; remember_web=abc123")
    );

    assert_eq!(
        sink.lines_of(LogCategory::Info),
        vec![
            "article url: https://fd2ppv.cc/articles/4347402".to_string(),
            "data fetched successfully".to_string(),
        ]
    );
    assert!(sink.lines_of(LogCategory::Error).is_empty());
    let req = sink.lines_of(LogCategory::Req);
    assert_eq!(req.first().map(String::as_str), Some("-> fd2ppv"));
    assert!(req.last().unwrap().ends_with("s) "));
}

#[tokio::test]
async fn test_appoint_url_overrides_canonical() {
    let url = "https://mirror.example/articles/custom";
    let fetcher = Arc::new(FakeFetcher::default().with_page(url, ARTICLE));
    let (scraper, _) = make_scraper(fetcher.clone(), config(Some(COOKIE)));

    let record = record(&scraper.extract("FC2-4347402", Some(url)).await);
    assert_eq!(record["website"], url);
    assert_eq!(record["number"], "FC2-4347402");
    assert_eq!(fetcher.requests()[0].0, url);
}

#[tokio::test]
async fn test_missing_cookie_skips_network() {
    let fetcher = Arc::new(FakeFetcher::default());
    let (scraper, sink) = make_scraper(fetcher.clone(), config(None));

    let result = scraper.extract("FC2-PPV-4347402", None).await;

    assert_empty_everywhere(&result);
    assert!(fetcher.requests().is_empty());
    assert_eq!(
        sink.lines_of(LogCategory::Error),
        vec![ScrapeError::CookieMissing.to_string()]
    );
}

#[tokio::test]
async fn test_fetch_failure_collapses_to_empty() {
    let fetcher = Arc::new(FakeFetcher::default());
    let (scraper, sink) = make_scraper(fetcher.clone(), config(Some(COOKIE)));

    let result = scraper.extract("4347402", None).await;

    assert_empty_everywhere(&result);
    assert_eq!(fetcher.requests().len(), 1);
    let errors = sink.lines_of(LogCategory::Error);
    assert_eq!(errors, vec!["network request failed: unexpected status 404"]);
}

#[tokio::test]
async fn test_empty_body_is_a_network_failure() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/1", "  \n"),
    );
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let err = scraper.scrape("1", None).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Network(_)));
}

#[tokio::test]
async fn test_guest_page_is_not_logged_in() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/4347402", HOME_GUEST),
    );
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let err = scraper.scrape("4347402", None).await.unwrap_err();
    assert_eq!(err, ScrapeError::NotLoggedIn);
    assert_empty_everywhere(&scraper.extract("4347402", None).await);
}

#[tokio::test]
async fn test_page_without_brief_fails_on_title() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/4347402", HOME_LOGGED_IN),
    );
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let err = scraper.scrape("4347402", None).await.unwrap_err();
    assert_eq!(err, ScrapeError::MissingTitle);
}

#[tokio::test]
async fn test_seller_as_actor_rule() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/4347402", ARTICLE),
    );
    let mut config = config(Some(COOKIE));
    config.fields_rule = vec!["fc2_seller".to_string()];
    let (scraper, _) = make_scraper(fetcher, config);

    let record = scraper.scrape("4347402", None).await.unwrap();
    assert_eq!(record.actor, "Lakeside Films");
    // Photos still come from the cast section.
    assert_eq!(record.actor_photo.len(), 2);
}

#[tokio::test]
async fn test_base_url_override() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("http://127.0.0.1:8080/articles/4347402", ARTICLE),
    );
    let mut config = config(Some(COOKIE));
    config.base_url = Some("http://127.0.0.1:8080/".to_string());
    let (scraper, _) = make_scraper(fetcher, config);

    let record = scraper.scrape("4347402", None).await.unwrap();
    assert_eq!(
        record.actor_photo["Hana"],
        "http://127.0.0.1:8080/storage/avatars/hana.jpg"
    );
}

#[tokio::test]
async fn test_extract_is_idempotent() {
    let fetcher = Arc::new(
        FakeFetcher::default().with_page("https://fd2ppv.cc/articles/4347402", ARTICLE),
    );
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let first = scraper.extract("FC2-PPV-4347402", None).await;
    let second = scraper.extract("FC2-PPV-4347402", None).await;
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_check_cookie_valid() {
    let fetcher = Arc::new(FakeFetcher::default().with_page("https://fd2ppv.cc/", HOME_LOGGED_IN));
    let (scraper, _) = make_scraper(fetcher.clone(), config(Some(COOKIE)));

    let status = scraper.check_cookie_valid().await;
    assert!(status.valid);
    assert_eq!(fetcher.requests()[0].0, "https://fd2ppv.cc/");
}

#[tokio::test]
async fn test_check_cookie_expired() {
    let fetcher = Arc::new(FakeFetcher::default().with_page("https://fd2ppv.cc/", HOME_GUEST));
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let status = scraper.check_cookie_valid().await;
    assert!(!status.valid);
    assert!(status.message.contains("invalid or expired"));
}

#[tokio::test]
async fn test_check_cookie_unconfigured_and_network_error() {
    let fetcher = Arc::new(FakeFetcher::default());
    let (unconfigured, _) = make_scraper(fetcher.clone(), config(None));
    let status = unconfigured.check_cookie_valid().await;
    assert!(!status.valid);
    assert!(status.message.contains("not configured"));
    assert!(fetcher.requests().is_empty());

    let (offline, _) = make_scraper(fetcher.clone(), config(Some(COOKIE)));
    let status = offline.check_cookie_valid().await;
    assert!(!status.valid);
    assert!(status.message.starts_with("network request failed"));
}

#[tokio::test]
async fn test_concurrent_extracts_are_independent() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page("https://fd2ppv.cc/articles/4347402", ARTICLE)
            .with_page("https://fd2ppv.cc/articles/1", HOME_GUEST),
    );
    let (scraper, _) = make_scraper(fetcher, config(Some(COOKIE)));

    let good = tokio::spawn({
        let scraper = scraper.clone();
        async move { scraper.extract("4347402", None).await }
    });
    let bad = tokio::spawn({
        let scraper = scraper.clone();
        async move { scraper.extract("1", None).await }
    });

    let good = good.await.unwrap();
    let bad = bad.await.unwrap();
    assert!(!good.is_empty_for(SITE_NAME));
    assert!(bad.is_empty_for(SITE_NAME));
}
