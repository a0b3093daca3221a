use chrono::{DateTime, Local};
use colored::Colorize;
use pagemap_scanner::CrawlResult;
use std::collections::BTreeMap;
use std::str::FromStr;
use url::Url;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

/// Extract the path (and query) component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path();
            let path = if path.is_empty() { "/" } else { path };
            match u.query() {
                Some(query) => format!("{}?{}", path, query),
                None => path.to_string(),
            }
        })
        .unwrap_or_else(|| url.to_string())
}

pub fn generate_report(
    result: &CrawlResult,
    format: ReportFormat,
    crawled_at: DateTime<Local>,
) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(result, crawled_at)),
        ReportFormat::Json => generate_json_report(result),
    }
}

/// `{ "domain": ..., "pages": [...] }` with pages sorted.
pub fn generate_json_report(result: &CrawlResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn generate_text_report(result: &CrawlResult, crawled_at: DateTime<Local>) -> String {
    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n\n# Summary:\n");
    report.push_str(&format!(
        "  Seed: {}\n",
        result.domain().unwrap_or("(none)")
    ));
    report.push_str(&format!(
        "  Crawled at: {}\n",
        crawled_at.format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str(&format!("  Pages found: {}\n", result.len()));
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");

    // Unparseable page strings are listed whole under their own heading
    let mut by_host: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for page in result.sorted_pages() {
        match Url::parse(page).ok().and_then(|u| u.host_str().map(str::to_string)) {
            Some(host) => by_host.entry(host).or_default().push(extract_url_path(page)),
            None => by_host
                .entry("(unparsed)".to_string())
                .or_default()
                .push(page.to_string()),
        }
    }

    for (host, paths) in by_host.iter() {
        report.push_str(&format!("## {}\n", host.bright_white().bold()));
        report.push_str(&format!("  {} pages found\n\n", paths.len()));
        for path in paths {
            report.push_str(&format!("  {} {}\n", "•".green(), path));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_extract_url_path() {
        assert_eq!(extract_url_path("https://example.com"), "/");
        assert_eq!(extract_url_path("https://example.com/api/users"), "/api/users");
        assert_eq!(extract_url_path("https://example.com/search?q=rust#top"), "/search?q=rust");
        assert_eq!(extract_url_path("not a url"), "not a url");
    }

    #[test]
    fn test_empty_result_text_report() {
        let report = generate_text_report(&CrawlResult::empty(None), Local::now());
        assert!(report.contains("Seed: (none)"));
        assert!(report.contains("Pages found: 0"));
        assert!(!report.contains("## "));
    }

    #[test]
    fn test_unparsed_pages_listed_whole() {
        let pages: HashSet<String> = ["not a url".to_string()].into_iter().collect();
        let result = CrawlResult::new(Some("not a url".to_string()), pages);

        let report = generate_text_report(&result, Local::now());
        assert!(report.contains("(unparsed)"));
        assert!(report.contains("not a url"));
    }
}
