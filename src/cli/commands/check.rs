//! Cookie check command.

use console::style;

use fd2ppv::config::Config;
use fd2ppv::Fd2ppvScraper;

/// Report whether the configured cookie signs in; exits 1 when it does not.
pub async fn cmd_check_cookie(config: Config) -> anyhow::Result<()> {
    let scraper = Fd2ppvScraper::from_config(config)?;
    let status = scraper.check_cookie_valid().await;

    if status.valid {
        println!("{} {}", style("✓").green(), status.message);
        Ok(())
    } else {
        eprintln!("{} {}", style("✗").red(), status.message);
        std::process::exit(1);
    }
}
