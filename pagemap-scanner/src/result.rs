use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// Outcome of one crawl: the seed exactly as given and every page visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    domain: Option<String>,
    #[serde(serialize_with = "serialize_sorted")]
    pages: HashSet<String>,
}

impl CrawlResult {
    pub fn new(domain: Option<String>, pages: HashSet<String>) -> Self {
        Self { domain, pages }
    }

    /// Result for a seed that was absent or empty. Nothing was fetched.
    pub fn empty(domain: Option<String>) -> Self {
        Self {
            domain,
            pages: HashSet::new(),
        }
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn pages(&self) -> &HashSet<String> {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains(url)
    }

    /// Pages in lexicographic order, for stable output.
    pub fn sorted_pages(&self) -> Vec<&str> {
        let mut pages: Vec<&str> = self.pages.iter().map(String::as_str).collect();
        pages.sort_unstable();
        pages
    }

    pub fn into_pages(self) -> HashSet<String> {
        self.pages
    }
}

fn serialize_sorted<S: Serializer>(pages: &HashSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut sorted: Vec<&String> = pages.iter().collect();
    sorted.sort_unstable();
    serializer.collect_seq(sorted)
}
