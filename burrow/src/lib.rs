pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlOptions, CrawlReport, DEFAULT_DEPTH, DEFAULT_URL, ReportFormat, execute_crawl,
    generate_json_report, generate_text_report, render_report, write_report,
};

// Re-export the crawl engine from burrow-scanner
pub use burrow_scanner::{Crawler, ScanError};
