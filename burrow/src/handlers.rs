use anyhow::{Context, Result};
use burrow_scanner::{Crawler, ScanError};
use clap::ArgMatches;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_URL: &str = "https://www.example.com/";
pub const DEFAULT_DEPTH: i32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How the discovered links are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Numbered plain-text listing
    Text,
    /// Pretty-printed JSON document
    Json,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub depth: i32,
    pub timeout_secs: u64,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            depth: DEFAULT_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            format: ReportFormat::Text,
            output: None,
            quiet: false,
            verbose: false,
        }
    }
}

impl CrawlOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            url: matches
                .get_one::<String>("url")
                .cloned()
                .unwrap_or(defaults.url),
            depth: matches
                .get_one::<i32>("depth")
                .copied()
                .unwrap_or(defaults.depth),
            timeout_secs: matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(defaults.timeout_secs),
            format: matches
                .get_one::<String>("format")
                .map(String::as_str)
                .and_then(ReportFormat::from_name)
                .unwrap_or(defaults.format),
            output: matches.get_one::<PathBuf>("output").cloned(),
            quiet: matches.get_flag("quiet"),
            verbose: matches.get_flag("verbose"),
        }
    }
}

/// Everything a report needs: where the crawl started and what it found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub root: String,
    pub depth: i32,
    pub links: Vec<String>,
}

/// Run a crawl with the given options and collect the sorted links
pub async fn execute_crawl(options: &CrawlOptions) -> Result<CrawlReport, ScanError> {
    let mut crawler = Crawler::with_timeout(options.timeout_secs);

    if options.verbose {
        crawler = crawler.with_discovery_callback(Arc::new(|link: &str, depth: i32| {
            eprintln!(
                "  {} {} {}",
                "→".blue(),
                link,
                format!("(depth {})", depth).dimmed()
            );
        }));
    }

    let links = crawler.crawl(&options.url, options.depth).await?;

    Ok(CrawlReport {
        root: options.url.clone(),
        depth: options.depth,
        links,
    })
}

/// Header, separator, then one `NNN. url` line per link and a blank line.
pub fn generate_text_report(links: &[String]) -> String {
    let mut report = String::from("Links\n-----\n");
    for (index, link) in links.iter().enumerate() {
        report.push_str(&format!("{:03}. {}\n", index + 1, link));
    }
    report.push('\n');
    report
}

pub fn generate_json_report(report: &CrawlReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    json.push('\n');
    Ok(json)
}

pub fn render_report(report: &CrawlReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(&report.links)),
        ReportFormat::Json => generate_json_report(report),
    }
}

/// Write the rendered report to `output`, or to stdout when no path is given
pub fn write_report(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_banner(options: &CrawlOptions) {
    eprintln!(
        "{} {}",
        "burrow".bright_green().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    eprintln!(
        "{} Crawling {} (max depth {})\n",
        "→".blue(),
        options.url.bright_white(),
        options.depth
    );
}

pub async fn run_crawl(options: &CrawlOptions) -> Result<()> {
    let report = execute_crawl(options).await?;
    let rendered = render_report(&report, options.format)?;
    debug!(
        "Rendered {:?} report with {} links",
        options.format,
        report.links.len()
    );
    write_report(&rendered, options.output.as_deref())?;

    if let Some(path) = &options.output
        && !options.quiet
    {
        eprintln!(
            "{} {} links saved to {}",
            "✓".green().bold(),
            report.links.len(),
            path.display().to_string().bright_white()
        );
    }
    Ok(())
}

pub async fn handle_crawl(matches: &ArgMatches) {
    init_tracing();

    let options = CrawlOptions::from_matches(matches);
    if !options.quiet {
        print_banner(&options);
    }

    if let Err(e) = run_crawl(&options).await {
        eprintln!("{} {:#}", "✗ Crawl failed:".red().bold(), e);
        std::process::exit(1);
    }
}
