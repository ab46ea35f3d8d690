//! Scraper for fd2ppv.cc FC2 article pages.
//!
//! Article pages are only rendered in full for signed-in sessions, so every
//! request carries the operator's session cookie. A scrape either yields a
//! complete [`MovieRecord`] or fails with a [`ScrapeError`]; [`Fd2ppvScraper::extract`]
//! collapses failures to the empty record and reports them through the
//! progress sink instead.

pub mod extract;
pub mod number;

use std::sync::Arc;
use std::time::Instant;

use scraper::Html;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use self::extract::{
    get_actor, get_actor_photo, get_cover, get_mosaic, get_outline, get_release_date,
    get_runtime, get_studio, get_title, get_year, is_logged_in,
};
use self::number::{display_number, normalize_number};
use super::cookies::CookieMap;
use super::http_client::{FetchText, HttpClient};
use super::log_sink::{LogCategory, LogSink, TracingSink};
use crate::config::{Config, ConfigProvider, FIELD_RULE_SELLER_AS_ACTOR};
use crate::models::{empty_record, ActorPhotos, LocalizedResult, MovieRecord};

/// Key the localized result is stored under.
pub const SITE_NAME: &str = "fd2ppv";

/// Why a scrape produced no record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("FD2PPV cookie is not configured, skipping")]
    CookieMissing,

    #[error("network request failed: {0}")]
    Network(String),

    #[error("FD2PPV cookie is invalid or expired")]
    NotLoggedIn,

    #[error("failed to get data: no title found")]
    MissingTitle,

    #[error("failed to build record: {0}")]
    Assembly(String),
}

/// Outcome of [`Fd2ppvScraper::check_cookie_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieStatus {
    pub valid: bool,
    pub message: String,
}

impl CookieStatus {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// fd2ppv.cc scraper with its collaborators injected.
#[derive(Clone)]
pub struct Fd2ppvScraper {
    fetcher: Arc<dyn FetchText>,
    config: Arc<dyn ConfigProvider>,
    log: Arc<dyn LogSink>,
}

impl Fd2ppvScraper {
    /// Create a scraper that reports progress through `tracing`.
    pub fn new(fetcher: Arc<dyn FetchText>, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            fetcher,
            config,
            log: Arc::new(TracingSink),
        }
    }

    /// Create a scraper backed by a reqwest client built from `config`.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let client = HttpClient::with_options(&config.http_options())?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }

    /// Send progress lines to `log` instead of `tracing`.
    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    fn req(&self, line: &str) {
        self.log.write(LogCategory::Req, line);
    }

    fn info(&self, line: &str) {
        self.log.write(LogCategory::Info, line);
    }

    /// Canonical article URL for a normalized number.
    pub fn article_url(&self, number: &str) -> String {
        format!("{}/articles/{}", self.config.base_url(), number)
    }

    fn cookies(&self) -> Option<CookieMap> {
        self.config.cookie().map(CookieMap::parse)
    }

    /// Scrape one title, returning the record wrapped for every locale.
    ///
    /// Never fails: on any error the record is `{title, thumb, website}` with
    /// empty values, and the reason is written to the progress sink.
    pub async fn extract(&self, number: &str, appoint_url: Option<&str>) -> LocalizedResult {
        let start = Instant::now();
        self.req(&format!("-> {}", SITE_NAME));

        let outcome = match self.scrape(number, appoint_url).await {
            Ok(record) => self.assemble(&record),
            Err(e) => Err(e),
        };

        let record = match outcome {
            Ok(record) => record,
            Err(e) => {
                self.log.write(LogCategory::Error, &e.to_string());
                empty_record()
            }
        };

        self.req(&format!("({}s) ", start.elapsed().as_secs_f64().round() as u64));
        LocalizedResult::new(SITE_NAME, record)
    }

    /// Scrape one title.
    ///
    /// `appoint_url` replaces the canonical article URL when non-empty.
    pub async fn scrape(
        &self,
        number: &str,
        appoint_url: Option<&str>,
    ) -> Result<MovieRecord, ScrapeError> {
        let number = normalize_number(number);

        let cookies = match self.cookies() {
            Some(cookies) => cookies,
            None => return Err(self.fail(ScrapeError::CookieMissing)),
        };

        let url = match appoint_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => url.to_string(),
            None => self.article_url(&number),
        };
        self.info(&format!("article url: {}", url));

        let text = match self.fetcher.fetch_text(&url, &cookies).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                return Err(self.fail(ScrapeError::Network("empty response body".to_string())))
            }
            Err(e) => return Err(self.fail(ScrapeError::Network(e.to_string()))),
        };

        let use_seller = self.config.has_field_rule(FIELD_RULE_SELLER_AS_ACTOR);
        parse_article(&text, &number, &url, self.config.base_url(), use_seller)
            .map_err(|e| self.fail(e))
    }

    /// Log a failure as a progress line and hand it back.
    fn fail(&self, error: ScrapeError) -> ScrapeError {
        self.info(&error.to_string());
        error
    }

    /// Turn the record into the mapping handed to callers.
    fn assemble(&self, record: &MovieRecord) -> Result<Value, ScrapeError> {
        match serde_json::to_value(record) {
            Ok(value) => {
                self.info("data fetched successfully");
                Ok(value)
            }
            Err(e) => Err(self.fail(ScrapeError::Assembly(e.to_string()))),
        }
    }

    /// Check whether the configured cookie still signs in.
    ///
    /// Fetches the site root once; not part of the scrape path.
    pub async fn check_cookie_valid(&self) -> CookieStatus {
        let cookies = match self.cookies() {
            Some(cookies) => cookies,
            None => return CookieStatus::invalid("FD2PPV cookie is not configured"),
        };

        let url = format!("{}/", self.config.base_url());
        debug!("checking {} cookies against {}", cookies.len(), url);

        let text = match self.fetcher.fetch_text(&url, &cookies).await {
            Ok(text) => text,
            Err(e) => return CookieStatus::invalid(format!("network request failed: {}", e)),
        };

        if is_logged_in(&Html::parse_document(&text)) {
            CookieStatus::valid("FD2PPV cookie is valid")
        } else {
            CookieStatus::invalid(
                "FD2PPV cookie is invalid or expired, copy it from the browser again",
            )
        }
    }
}

/// Parse an article page into a record.
fn parse_article(
    text: &str,
    number: &str,
    url: &str,
    base_url: &str,
    use_seller: bool,
) -> Result<MovieRecord, ScrapeError> {
    let html = Html::parse_document(text);

    if !is_logged_in(&html) {
        return Err(ScrapeError::NotLoggedIn);
    }

    let title = get_title(&html);
    if title.is_empty() {
        return Err(ScrapeError::MissingTitle);
    }

    let cover = get_cover(&html);
    let outline = get_outline(&html);
    let release = get_release_date(&html);
    let year = get_year(&release);
    let mut actor = get_actor(&html);
    let mut actor_photo = get_actor_photo(&html, base_url);
    let studio = get_studio(&html);
    let mosaic = get_mosaic(&html);
    let runtime = get_runtime(&html);

    if use_seller {
        actor = studio.clone();
    }
    if actor_photo.is_empty() {
        actor_photo = ActorPhotos::from([(actor.clone(), String::new())]);
    }

    Ok(MovieRecord {
        number: display_number(number),
        title: title.clone(),
        originaltitle: title,
        outline: outline.clone(),
        actor,
        originalplot: outline,
        tag: String::new(),
        release,
        year,
        runtime,
        score: String::new(),
        series: "FC2系列".to_string(),
        director: String::new(),
        studio: studio.clone(),
        publisher: studio,
        source: "fc2".to_string(),
        website: url.to_string(),
        actor_photo,
        thumb: cover.clone(),
        poster: cover,
        extrafanart: Vec::new(),
        trailer: String::new(),
        image_download: false,
        image_cut: "center".to_string(),
        mosaic: mosaic.as_str().to_string(),
        wanted: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="user">您好, member</div>
        <div class="work-brief">A quiet afternoon</div>
        <div class="work-meta-label">賣家</div>
        <div class="work-meta-value"><a>Seller</a></div>
        </body></html>"#;

    #[test]
    fn test_parse_article_requires_login() {
        let err = parse_article("<p>guest</p>", "1", "u", "https://fd2ppv.cc", false).unwrap_err();
        assert_eq!(err, ScrapeError::NotLoggedIn);
    }

    #[test]
    fn test_parse_article_requires_title() {
        let err = parse_article("<p>您好</p>", "1", "u", "https://fd2ppv.cc", false).unwrap_err();
        assert_eq!(err, ScrapeError::MissingTitle);
    }

    #[test]
    fn test_parse_article_without_cast() {
        let record = parse_article(PAGE, "42", "u", "https://fd2ppv.cc", false).unwrap();
        assert_eq!(record.number, "FC2-42");
        assert_eq!(record.title, "A quiet afternoon");
        assert_eq!(record.outline, record.title);
        assert_eq!(record.actor, "");
        assert_eq!(record.actor_photo, ActorPhotos::from([(String::new(), String::new())]));
        assert_eq!(record.studio, "Seller");
        assert_eq!(record.publisher, "Seller");
        assert_eq!(record.mosaic, "有码");
        assert_eq!(record.series, "FC2系列");
    }

    #[test]
    fn test_parse_article_seller_as_actor() {
        let record = parse_article(PAGE, "42", "u", "https://fd2ppv.cc", true).unwrap();
        assert_eq!(record.actor, "Seller");
        assert_eq!(record.actor_photo, ActorPhotos::from([("Seller".to_string(), String::new())]));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ScrapeError::Network("timeout".to_string()).to_string(),
            "network request failed: timeout"
        );
        assert!(ScrapeError::CookieMissing.to_string().contains("not configured"));
    }
}
