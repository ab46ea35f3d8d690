//! fd2ppv - FC2 metadata scraper for fd2ppv.cc.
//!
//! Fetches a cookie-authenticated article page, extracts its metadata fields
//! and returns a normalized record wrapped for a multi-locale consumer.

pub mod config;
pub mod models;
pub mod scrapers;

pub use config::{Config, ConfigProvider};
pub use models::{LocalizedResult, MovieRecord};
pub use scrapers::fd2ppv::{CookieStatus, Fd2ppvScraper, ScrapeError};
pub use scrapers::{CookieMap, FetchError, FetchText, HttpClient};
