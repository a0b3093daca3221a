pub mod commands;
pub mod handlers;
pub mod report;

pub use handlers::{CrawlOptions, execute_crawl, resolve_output_path, write_report};
pub use report::{ReportFormat, extract_url_path, generate_report};
