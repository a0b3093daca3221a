pub mod crawler;
pub mod error;
pub mod fetch;
pub mod links;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use error::{Result, ScanError};
pub use fetch::{FetchSettings, Fetcher, HttpFetcher, StaticFetcher};
pub use links::is_absolute;
pub use result::CrawlResult;
