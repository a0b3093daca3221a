use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ScanError {
    /// True for failures that mean "this page could not be retrieved".
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ScanError::Http(_) | ScanError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
