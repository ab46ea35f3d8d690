//! Scrape command.

use std::sync::Arc;

use console::{style, StyledObject};

use fd2ppv::config::Config;
use fd2ppv::scrapers::fd2ppv::SITE_NAME;
use fd2ppv::scrapers::{LogCategory, MemorySink};
use fd2ppv::Fd2ppvScraper;

/// Scrape one number and print the localized result.
///
/// Progress goes to `tracing` unless it has to be printed or reported.
pub async fn cmd_scrape(
    config: Config,
    number: &str,
    url: Option<&str>,
    trace: bool,
    strict: bool,
) -> anyhow::Result<()> {
    let capture = capture_sink(trace, strict);
    let mut scraper = Fd2ppvScraper::from_config(config)?;
    if let Some(ref sink) = capture {
        scraper = scraper.with_log_sink(sink.clone());
    }

    let result = scraper.extract(number, url).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    let Some(sink) = capture else {
        return Ok(());
    };

    if trace {
        for (category, line) in sink.lines() {
            eprintln!("[{}] {}", tag(category), line);
        }
    }

    if strict && result.is_empty_for(SITE_NAME) {
        let reason = sink
            .lines_of(LogCategory::Error)
            .pop()
            .unwrap_or_else(|| "no data".to_string());
        anyhow::bail!("scrape failed for {}: {}", number, reason);
    }

    Ok(())
}

fn capture_sink(trace: bool, strict: bool) -> Option<Arc<MemorySink>> {
    (trace || strict).then(|| Arc::new(MemorySink::new()))
}

fn tag(category: LogCategory) -> StyledObject<String> {
    let tag = style(category.to_string());
    match category {
        LogCategory::Req => tag.dim(),
        LogCategory::Info => tag.cyan(),
        LogCategory::Error => tag.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_goes_to_tracing_by_default() {
        assert!(capture_sink(false, false).is_none());
        assert!(capture_sink(true, false).is_some());
        assert!(capture_sink(false, true).is_some());
    }

    #[test]
    fn test_tag_uses_category_name() {
        assert!(tag(LogCategory::Error).to_string().contains("error"));
        assert!(tag(LogCategory::Req).to_string().contains("req"));
    }
}
