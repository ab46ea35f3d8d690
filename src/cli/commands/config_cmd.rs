//! Configuration management commands.

use console::style;

use fd2ppv::config::Config;
use fd2ppv::ConfigProvider;

/// Print the resolved configuration with the cookie hidden.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults + environment".to_string());

    eprintln!("  {} Source: {}", style("→").dim(), source);
    eprintln!("  {} Site: {}", style("→").dim(), config.base_url());
    if config.cookie().is_none() {
        eprintln!("{} No cookie configured", style("!").yellow());
    }

    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    Ok(())
}
