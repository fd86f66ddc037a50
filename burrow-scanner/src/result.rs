use std::collections::HashSet;

/// Links discovered during a single crawl.
///
/// `visited` and `links` always hold the same URLs; `links` keeps discovery
/// order until the crawl finishes.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    links: Vec<String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` unless it was already discovered. Returns whether it was new.
    pub fn record(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string());
        self.links.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in the order they were discovered.
    pub fn discovered(&self) -> &[String] {
        &self.links
    }

    pub fn into_sorted(self) -> Vec<String> {
        let mut links = self.links;
        links.sort();
        links
    }
}
