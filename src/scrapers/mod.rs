//! Scraper implementations and their HTTP plumbing.

pub mod cookies;
pub mod fd2ppv;
pub mod http_client;
pub mod log_sink;

pub use cookies::CookieMap;
pub use http_client::{FetchError, FetchText, HttpClient, HttpClientOptions};
pub use log_sink::{LogCategory, LogSink, MemorySink, TracingSink};

/// Resolve a path against a site origin, keeping absolute URLs as they are.
///
/// Returns an empty string for anything that is neither absolute nor
/// root-relative.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        String::new()
    }
}
