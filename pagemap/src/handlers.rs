use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagemap_scanner::{CrawlResult, Crawler, FetchSettings, HttpFetcher, ProgressCallback};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::{ReportFormat, generate_report};

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub show_progress: bool,
}

impl CrawlOptions {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            timeout_secs: FetchSettings::default().timeout_secs,
            user_agent: None,
            show_progress: false,
        }
    }

    fn fetch_settings(&self) -> FetchSettings {
        let settings = FetchSettings::default().with_timeout(self.timeout_secs);
        match self.user_agent {
            Some(ref user_agent) => settings.with_user_agent(user_agent.as_str()),
            None => settings,
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
pub fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expands a leading `~` in a user-supplied output path.
pub fn resolve_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Writes the report to `output`, or stdout when no path was given.
pub fn write_report(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let path = resolve_output_path(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", report),
    }
    Ok(())
}

/// Execute a crawl with the given options
pub async fn execute_crawl(options: &CrawlOptions) -> Result<CrawlResult> {
    let fetcher = HttpFetcher::with_settings(options.fetch_settings())
        .context("Failed to build HTTP client")?;

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let mut crawler = Crawler::new(fetcher);
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let callback: ProgressCallback = Arc::new(move |count: usize, url: &str| {
            pb_clone.set_message(format!("Crawling... {} pages visited ({})", count, url));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    // The seed is passed through verbatim and echoed back as the domain
    let result = crawler.find_links(Some(options.seed.as_str())).await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(result)
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let seed = sub_matches
        .get_one::<String>("URL")
        .ok_or_else(|| anyhow!("A seed URL must be provided"))?;
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let user_agent = sub_matches.get_one::<String>("user-agent").cloned();
    let format: ReportFormat = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let output = sub_matches.get_one::<PathBuf>("output");
    let show_progress = !quiet && !sub_matches.get_flag("no-progress");

    if output.is_some() || format == ReportFormat::Json {
        colored::control::set_override(false);
    }

    if !quiet {
        eprintln!("\n{}  Crawling {}", "→".blue().bold(), seed.bright_white());
        eprintln!("Timeout: {}s\n", timeout_secs);
    }

    let options = CrawlOptions {
        seed: seed.clone(),
        timeout_secs,
        user_agent,
        show_progress,
    };

    let result = execute_crawl(&options).await?;

    if !quiet {
        eprintln!(
            "{} Crawl complete! {} pages found\n",
            "✓".green().bold(),
            result.len()
        );
    }

    let report = generate_report(&result, format, Local::now())
        .context("Failed to render report")?;
    write_report(&report, output.map(PathBuf::as_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_settings_from_options() {
        let mut options = CrawlOptions::new("https://example.com");
        options.timeout_secs = 3;
        options.user_agent = Some("custom/1.0".to_string());

        let settings = options.fetch_settings();
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.user_agent, "custom/1.0");
    }

    #[test]
    fn test_default_options_keep_default_user_agent() {
        let settings = CrawlOptions::new("https://example.com").fetch_settings();
        assert!(settings.user_agent.starts_with("pagemap/"));
        assert_eq!(settings.timeout_secs, 10);
    }
}
