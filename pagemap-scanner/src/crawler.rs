use crate::error::Result;
use crate::fetch::Fetcher;
use crate::links;
use crate::result::CrawlResult;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Called each time a page is marked visited, with the visited count so far.
pub type ProgressCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// Maps a single site by following same-site links from a seed URL.
///
/// Pages are expanded one at a time, depth-first, in the order their links
/// appear. A page is marked visited before it is fetched, so a page that
/// fails to load is still reported and is only attempted once.
pub struct Crawler<F> {
    fetcher: F,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls everything reachable from `seed` and returns the visited pages.
    ///
    /// Never fails. An absent or empty seed yields an empty result without
    /// fetching anything; fetch and parse failures only make the page set
    /// smaller.
    pub async fn find_links(&self, seed: Option<&str>) -> CrawlResult {
        let seed = match seed {
            Some(seed) if !seed.is_empty() => seed,
            _ => return CrawlResult::empty(seed.map(str::to_string)),
        };

        info!("Starting crawl of {}", seed);

        let mut visited = HashSet::new();
        self.expand(seed, &mut visited).await;

        info!("Crawl complete. Visited {} pages", visited.len());
        CrawlResult::new(Some(seed.to_string()), visited)
    }

    /// Depth-first expansion from `start` using an explicit stack.
    ///
    /// Children are pushed in reverse so they pop in document order, giving
    /// the same visiting order as a recursive walk. The visited check happens
    /// on pop, which is the sole cycle guard.
    async fn expand(&self, start: &str, visited: &mut HashSet<String>) {
        let mut stack = vec![start.to_string()];

        while let Some(url) = stack.pop() {
            if !visited.insert(url.clone()) {
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(visited.len(), url.as_str());
            }

            let hrefs = match self.fetch_hrefs(&url).await {
                Ok(hrefs) => hrefs,
                Err(e) if e.is_fetch_error() => {
                    warn!(url = %url, error = %e, "Failed to fetch page");
                    continue;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to read links from page");
                    continue;
                }
            };

            let base_url = links::trim_trailing_slashes(&url);
            let mut children = Self::candidates(base_url, &hrefs);
            children.retain(|child| !visited.contains(child));
            stack.extend(children.into_iter().rev());
        }
    }

    async fn fetch_hrefs(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(url).await?;
        let hrefs = links::extract_hrefs(&html)?;
        debug!("Fetched {} ({} anchors)", url, hrefs.len());
        Ok(hrefs)
    }

    /// In-scope candidate URLs for the page at `base_url`, in document order.
    fn candidates(base_url: &str, hrefs: &[String]) -> Vec<String> {
        let mut candidates = Vec::new();

        for href in hrefs {
            if !links::is_navigable(href) {
                debug!("Skipping non-navigable link {:?}", href);
                continue;
            }

            let candidate = links::resolve_candidate(base_url, href);
            if links::is_in_scope(&candidate, base_url) {
                debug!("Found link: {} (base: {})", candidate, base_url);
                candidates.push(candidate);
            } else {
                debug!("  -> Out of scope, skipping {}", candidate);
            }
        }

        candidates
    }
}
