use crate::domain::same_site;
use crate::error::{Result, ScanError};
use crate::fetch::{DEFAULT_USER_AGENT, Fetcher};
use crate::resolve::resolve;
use crate::result::CrawlState;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Called once per newly discovered link with the link and the remaining
/// depth of the page it was found on.
pub type DiscoveryCallback = Arc<dyn Fn(&str, i32) + Send + Sync>;

/// Depth-first, same-site link discovery.
///
/// A `Crawler` only carries configuration. Every call to [`Crawler::crawl`]
/// starts from an empty visited set, so one instance can be reused for any
/// number of crawls.
pub struct Crawler {
    timeout_secs: u64,
    user_agent: String,
    discovery_callback: Option<DiscoveryCallback>,
}

// One page being expanded: the stack of these replaces recursion.
struct Frame {
    url: String,
    depth: i32,
    hrefs: std::vec::IntoIter<String>,
}

impl Crawler {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            discovery_callback: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_discovery_callback(mut self, callback: DiscoveryCallback) -> Self {
        self.discovery_callback = Some(callback);
        self
    }

    /// Crawls `root_url` and returns every same-site link found, sorted.
    ///
    /// The root page is expanded with the full `max_depth`. A discovered link
    /// is expanded in turn only while the decremented depth stays above zero,
    /// so with `max_depth == 0` only the root's own links are returned. A
    /// negative depth does no work at all.
    ///
    /// Pages that fail to load and hrefs that fail to resolve are logged and
    /// skipped. The only error is an empty `root_url` (or a client that cannot
    /// be built).
    ///
    /// Each page body is read to the end before its links are followed, so a
    /// slow subtree cannot starve the body of the page that linked to it.
    /// Bodies are tokenized as they stream in, which makes the returned future
    /// not `Send`; drive it from `block_on` or a local task.
    pub async fn crawl(&self, root_url: &str, max_depth: i32) -> Result<Vec<String>> {
        if root_url.is_empty() {
            return Err(ScanError::InvalidInput("root URL cannot be empty".to_string()));
        }

        info!("Starting crawl of {} with max depth {}", root_url, max_depth);

        let fetcher = Fetcher::new(self.timeout_secs, &self.user_agent)?;
        let mut state = CrawlState::new();
        let mut stack: Vec<Frame> = Vec::new();

        if let Some(frame) = Self::open(&fetcher, root_url, max_depth).await {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(href) = frame.hrefs.next() else {
                debug!("Finished {}", frame.url);
                stack.pop();
                continue;
            };
            let depth = frame.depth;

            let link = match resolve(&href, &frame.url) {
                Ok(Some(link)) => link,
                Ok(None) => {
                    debug!("Skipping non-page href {:?} on {}", href, frame.url);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping href {:?} on {}: {}", href, frame.url, e);
                    continue;
                }
            };

            if !same_site(&link, root_url) {
                debug!("  -> {} is off-site, skipping", link);
                continue;
            }

            if !state.record(&link) {
                continue;
            }
            debug!("  -> Discovered {} (depth {})", link, depth);

            if let Some(callback) = &self.discovery_callback {
                callback(&link, depth);
            }

            if depth - 1 > 0
                && let Some(child) = Self::open(&fetcher, &link, depth - 1).await
            {
                stack.push(child);
            }
        }

        let links = state.into_sorted();
        info!("Crawl complete. Discovered {} links", links.len());
        Ok(links)
    }

    async fn open(fetcher: &Fetcher, url: &str, depth: i32) -> Option<Frame> {
        if depth < 0 {
            return None;
        }

        match fetcher.fetch(url).await {
            Ok(page) => {
                let url = page.url().to_string();
                let hrefs = page.read_hrefs().await;
                debug!("Read {} hrefs from {}", hrefs.len(), url);
                Some(Frame {
                    url,
                    depth,
                    hrefs: hrefs.into_iter(),
                })
            }
            Err(e) => {
                warn!("Crawl error for {}: {}", url, e);
                None
            }
        }
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
