//! User agent selection for page fetches.

use std::sync::atomic::{AtomicUsize, Ordering};

pub const USER_AGENT: &str = concat!("fd2ppv/", env!("CARGO_PKG_VERSION"), " (metadata scraper)");

/// Desktop browser user agents for `user_agent = "impersonate"`.
pub const IMPERSONATE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
];

static NEXT_AGENT: AtomicUsize = AtomicUsize::new(0);

/// Rotate through the browser agents, one per built client.
fn next_browser_agent() -> &'static str {
    let idx = NEXT_AGENT.fetch_add(1, Ordering::Relaxed);
    IMPERSONATE_USER_AGENTS[idx % IMPERSONATE_USER_AGENTS.len()]
}

/// Resolve the configured user agent.
/// - None => crate user agent
/// - "impersonate" => a browser user agent
/// - other => used verbatim
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config.map(str::trim) {
        None | Some("") => USER_AGENT.to_string(),
        Some("impersonate") => next_browser_agent().to_string(),
        Some(custom) => custom.to_string(),
    }
}
