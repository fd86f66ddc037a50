pub mod crawler;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod resolve;
pub mod result;

pub use crawler::{Crawler, DiscoveryCallback};
pub use domain::{domain_key, same_site};
pub use error::{Result, ScanError};
pub use extract::LinkExtractor;
pub use fetch::{Fetcher, Page};
pub use resolve::resolve;
pub use result::CrawlState;
